// ==========================================
// QC 检验分析引擎 - 导入接口 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::{CellValue, DqNote, InspectionRecord, RawSheet};
use crate::importer::error::ImportResult;

// ==========================================
// WorkbookSource Trait
// ==========================================
// 用途: 工作簿数据源（Excel / CSV 目录 / 内存）
// 实现者: ExcelWorkbook, CsvWorkbook, MemoryWorkbook
pub trait WorkbookSource {
    /// 工作表名称（工作簿中的原始顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 读取单个工作表
    ///
    /// # 参数
    /// - name: 工作表名称
    ///
    /// # 返回
    /// - Ok(RawSheet): 原始单元格（第 0 行为表头）
    /// - Err: 工作表不存在或解析失败（调用方隔离，不影响其他工作表）
    fn read_sheet(&mut self, name: &str) -> ImportResult<RawSheet>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 用途: 数据行 → 检验记录
// 实现者: FieldMapper
pub trait RecordMapper: Send + Sync {
    /// 工作表至少需要的列数
    fn required_width(&self) -> usize;

    /// 将一行映射为检验记录
    ///
    /// # 参数
    /// - row: 行单元格（按列号）
    /// - row_number: 工作表内行号（用于 DQ 提示）
    /// - period: 来源工作表名称
    ///
    /// # 返回
    /// - Some((record, notes)): 映射成功，附带 DQ 提示
    /// - None: 订单号为空，该行丢弃
    fn map_row(
        &self,
        row: &[CellValue],
        row_number: usize,
        period: &str,
    ) -> Option<(InspectionRecord, Vec<DqNote>)>;
}
