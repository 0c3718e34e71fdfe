// ==========================================
// QC 检验分析引擎 - 检验记录实体
// ==========================================
// 职责: 单元格值 / 原始工作表 / 检验记录 / DQ 提示
// 生命周期: 导入时由一行数据创建，之后只读
// ==========================================

use crate::domain::types::DqLevel;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// CellValue - 单元格值（与数据源无关）
// ==========================================
// Excel / CSV / 内存数据源统一转换为此形态后再做字段映射
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 文本形态
    ///
    /// 整数值的数字不带 `.0` 后缀（订单号在 Excel 中常被存成数字）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            CellValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::from(value.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::DateTime(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

// ==========================================
// RawSheet - 原始工作表
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    /// 工作表名称（如 "JAN26"）
    pub name: String,

    /// 行数据（第 0 行为表头）
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// 最宽一行的列数
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// InspectionRecord - 检验记录
// ==========================================
// 不变量:
// - 所有计数字段非负（u64 保证）
// - 标记字段只有 已标记 / 未标记 两种取值
// - period 恒等于来源工作表名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    // ===== 标识 =====
    pub order_number: String,
    pub lot_number: String,

    // ===== 交期 =====
    pub due_date: Option<NaiveDate>,
    pub finished_date: Option<NaiveDate>,

    // ===== 产品 =====
    pub sku: String,

    // ===== 检验数量 =====
    pub quantity: u64,
    pub repairs: u64,
    pub repair_pct: Option<f64>,
    pub scrap: u64,
    pub pass_pct: Option<f64>,
    pub final_qty: u64,

    // ===== 责任人与标记 =====
    pub inspector: String,
    pub red_flag: bool,
    pub ncr_complete: bool,

    // ===== 缺陷发现环节 =====
    pub qc_fail: u64,
    pub sewing_fail: u64,

    // ===== 其他 =====
    pub stream: String,
    pub notes: String,

    /// 来源月份（工作表名称）
    pub period: String,
}

impl InspectionRecord {
    /// 延迟天数（完成日期 - 交期）
    ///
    /// # 返回
    /// - Some(days): 两个日期都存在（负数表示提前）
    /// - None: 任一日期缺失
    pub fn days_late(&self) -> Option<i64> {
        match (self.due_date, self.finished_date) {
            (Some(due), Some(finished)) => Some((finished - due).num_days()),
            _ => None,
        }
    }
}

// ==========================================
// DqNote - 数据质量提示
// ==========================================
// 不阻断导入，随导入报告返回给调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqNote {
    pub sheet: String,
    /// 工作表内行号（0 为表头）
    pub row_number: usize,
    pub order_number: Option<String>,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}
