// ==========================================
// QC 检验分析引擎 - 领域模型层
// ==========================================
// 职责: 定义检验记录、指标结果对象、领域枚举
// 红线: 不含导入逻辑，不含引擎逻辑
// ==========================================

pub mod inspection;
pub mod metrics;
pub mod types;

// 重导出核心类型
pub use inspection::{CellValue, DqNote, InspectionRecord, RawSheet};
pub use metrics::{
    ConcentrationAlert, InspectorPerformanceRow, MonthlyTrendExtendedRow, MonthlyTrendRow,
    OnTimeMetrics, ProblemSkuRollups, RecurringSku, RedFlagOrderRow, RedFlagSkuRow, RepairSkuRow,
    SewingIssueRow, SkuRollupRow, SummaryMetrics,
};
pub use types::{DqLevel, EmptyReason, RoleView};
