// ==========================================
// QC 检验分析引擎 - 导入层
// ==========================================
// 职责: 工作簿 → 检验记录（列映射 / 清洗 / DQ 提示）
// 支持: Excel, CSV 目录, 内存
// ==========================================

// 模块声明
pub mod cache;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod schema;
pub mod sheet_importer;

// 重导出核心类型
pub use cache::PeriodCache;
pub use data_cleaner::DataCleaner;
pub use dq_validator::DqValidator;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{open_workbook, CsvWorkbook, ExcelWorkbook, MemoryWorkbook};
pub use schema::{ColumnSchema, RecordField};
pub use sheet_importer::{
    is_monthly_sheet, monthly_sheets, IngestionReport, LoadedSheet, SheetFailure, SheetImporter,
    SheetOutcome,
};

// 重导出 Trait 接口
pub use importer_trait::{RecordMapper, WorkbookSource};
