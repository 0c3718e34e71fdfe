// ==========================================
// QC 检验分析引擎 - 核心库
// ==========================================
// 输入: 月度检验跟踪表（Excel 工作簿 / CSV 目录）
// 输出: 质量 / 交付指标、排名、趋势、告警与洞察
// 系统定位: 同步批量计算，每次分析请求独立
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 检验记录与结果对象
pub mod domain;

// 导入层 - 工作簿读取与字段映射
pub mod importer;

// 引擎层 - 指标与洞察
pub mod engine;

// 配置层 - 阈值与词表
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 看板接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DqLevel, EmptyReason, RoleView};

// 领域实体
pub use domain::{InspectionRecord, SummaryMetrics};

// 导入
pub use importer::{open_workbook, SheetImporter, WorkbookSource};

// 引擎
pub use engine::{
    AnalysisEngine, AnalysisOutcome, AnalysisReport, InsightGenerator, MetricsAggregator,
    SkuNormalizer,
};

// 配置
pub use config::{AnalyticsConfig, ConfigManager};

// API
pub use api::{DashboardApi, DashboardResponse, MonthSelection};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "QC Tracker";
