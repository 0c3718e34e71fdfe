// ==========================================
// QC 检验分析引擎 - 配置层
// ==========================================
// 职责: 阈值 / SKU 词表 / 列结构 / 语言 的命名配置，支持覆写
// 存储: 扁平键值（JSON 文件或内存）
// ==========================================

pub mod analytics_config;
pub mod config_manager;
pub mod config_reader_trait;
pub mod error;

// 重导出核心配置管理器
pub use analytics_config::{AnalyticsConfig, DEFAULT_LOCALE};
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::AnalyticsConfigReader;
pub use error::{ConfigError, ConfigResult};
