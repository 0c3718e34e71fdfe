// ==========================================
// QC 检验分析引擎 - 引擎层
// ==========================================
// 职责: SKU 归一 / 月份日历 / 指标聚合 / 告警 / 洞察
// 红线: 引擎只读检验记录，不做文件 IO（重复问题扫描经 WorkbookSource 读取）
// ==========================================

pub mod calendar;
pub mod concentration;
pub mod delivery;
pub mod insight;
pub mod metrics;
pub mod orchestrator;
pub mod recurring;
pub mod sku;

// 重导出核心引擎
pub use calendar::{CalendarError, CalendarResult, MonthPreset, Period};
pub use concentration::{concentration_alerts, ConcentrationParams};
pub use delivery::{on_time_metrics, DEFAULT_ON_TIME_TARGET};
pub use insight::{InsightGenerator, InsightThresholds};
pub use metrics::{average_touch_rate, rate, round_to, MetricsAggregator};
pub use orchestrator::{AnalysisEngine, AnalysisOutcome, AnalysisReport};
pub use recurring::{RecurringParams, RecurringScanner};
pub use sku::{SkuCatalog, SkuNormalizer, NONE_FOUND};
