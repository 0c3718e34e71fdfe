// ==========================================
// QC 检验分析引擎 - 列结构映射
// ==========================================
// 职责: 字段 ↔ 列号 的显式、带版本的映射
// 说明: 表格布局变化时只改这里，不改映射代码
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RecordField - 检验记录字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    OrderNumber,
    LotNumber,
    DueDate,
    FinishedDate,
    Sku,
    Quantity,
    Repairs,
    RepairPct,
    Scrap,
    PassPct,
    FinalQty,
    Inspector,
    RedFlag,
    NcrComplete,
    QcFail,
    SewingFail,
    Stream,
    Notes,
}

impl RecordField {
    /// 默认列顺序（v1）
    pub const ORDERED: [RecordField; 18] = [
        RecordField::OrderNumber,
        RecordField::LotNumber,
        RecordField::DueDate,
        RecordField::FinishedDate,
        RecordField::Sku,
        RecordField::Quantity,
        RecordField::Repairs,
        RecordField::RepairPct,
        RecordField::Scrap,
        RecordField::PassPct,
        RecordField::FinalQty,
        RecordField::Inspector,
        RecordField::RedFlag,
        RecordField::NcrComplete,
        RecordField::QcFail,
        RecordField::SewingFail,
        RecordField::Stream,
        RecordField::Notes,
    ];

    /// 表头名称（与跟踪表一致）
    pub fn header(&self) -> &'static str {
        match self {
            RecordField::OrderNumber => "Order_Number",
            RecordField::LotNumber => "Lot_Number",
            RecordField::DueDate => "Due_Date",
            RecordField::FinishedDate => "Finished_Date",
            RecordField::Sku => "SKU",
            RecordField::Quantity => "Quantity",
            RecordField::Repairs => "Repairs",
            RecordField::RepairPct => "Repair_Pct",
            RecordField::Scrap => "Scrap",
            RecordField::PassPct => "Pass_Pct",
            RecordField::FinalQty => "Final_Qty",
            RecordField::Inspector => "Inspector",
            RecordField::RedFlag => "Red_Flag",
            RecordField::NcrComplete => "NCR_Complete",
            RecordField::QcFail => "QC_Fail",
            RecordField::SewingFail => "Sewing_Fail",
            RecordField::Stream => "Stream",
            RecordField::Notes => "Notes",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

// ==========================================
// ColumnSchema - 列结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// 结构版本号
    pub version: u32,

    /// (字段, 列号) 列表，列号从 0 开始
    pub columns: Vec<(RecordField, usize)>,
}

impl ColumnSchema {
    /// 当前跟踪表布局：前 18 列依次对应 18 个字段
    pub fn v1() -> Self {
        Self {
            version: 1,
            columns: RecordField::ORDERED
                .iter()
                .enumerate()
                .map(|(idx, field)| (*field, idx))
                .collect(),
        }
    }

    /// 字段所在列
    pub fn column_of(&self, field: RecordField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, col)| *col)
    }

    /// 工作表至少需要的列数
    pub fn required_width(&self) -> usize {
        self.columns
            .iter()
            .map(|(_, col)| col + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::v1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_layout() {
        let schema = ColumnSchema::v1();
        assert_eq!(schema.version, 1);
        assert_eq!(schema.required_width(), 18);
        assert_eq!(schema.column_of(RecordField::OrderNumber), Some(0));
        assert_eq!(schema.column_of(RecordField::Sku), Some(4));
        assert_eq!(schema.column_of(RecordField::Inspector), Some(11));
        assert_eq!(schema.column_of(RecordField::Notes), Some(17));
    }

    #[test]
    fn test_custom_layout_width() {
        let schema = ColumnSchema {
            version: 2,
            columns: vec![(RecordField::OrderNumber, 3), (RecordField::Quantity, 20)],
        };
        assert_eq!(schema.required_width(), 21);
        assert_eq!(schema.column_of(RecordField::Scrap), None);
    }
}
