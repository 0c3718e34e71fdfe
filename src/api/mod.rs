// ==========================================
// QC 检验分析引擎 - API 层
// ==========================================
// 职责: 提供看板接口，供命令行 / 展示层调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{
    sections_for, DashboardApi, DashboardResponse, DashboardSection, DashboardView,
    InspectorComparison, MonthSelection,
};
pub use error::{ApiError, ApiResult};
