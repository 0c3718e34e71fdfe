// ==========================================
// QC 检验分析引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: 扁平键值表（key → value 字符串），可从 JSON 文件加载
// 规则: 键缺失 → 默认值；值格式错误 → 默认值 + warn 日志
// ==========================================

use crate::config::config_reader_trait::AnalyticsConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::engine::concentration::ConcentrationParams;
use crate::engine::insight::InsightThresholds;
use crate::engine::recurring::RecurringParams;
use crate::engine::sku::{SkuCatalog, DEFAULT_COLOR_CODES, DEFAULT_EXCEPTIONS};
use crate::i18n::SUPPORTED_LOCALES;
use crate::importer::ColumnSchema;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: JSON 文件路径，顶层必须是对象
    ///
    /// # 返回
    /// - Err(FileNotFound / ReadError / ParseError): 文件本身不可用
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), keys = manager.values.len(), "配置文件已加载");
        Ok(manager)
    }

    /// 从 JSON 文本加载
    ///
    /// 数组值按逗号拼接，对象值保留为 JSON 文本，null 忽略
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::ParseError("顶层必须是 JSON 对象".to_string()));
        };

        let mut values = HashMap::new();
        for (key, value) in map {
            if let Some(text) = value_to_config_string(&value) {
                values.insert(key, text);
            }
        }
        Ok(Self { values })
    }

    /// 覆写单个配置项
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .unwrap_or(default)
            .trim()
            .to_string()
    }

    /// 解析数值配置；格式错误回退默认值
    fn parse_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Display + Copy,
    {
        let Some(raw) = self.get_config_value(key) else {
            return default;
        };
        raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(
                config_key = key,
                raw_value = %raw,
                default = %default,
                "配置值格式错误，使用默认值"
            );
            default
        })
    }

    /// 百分比配置（必须在 [0, 100]）
    fn percent_or_default(&self, key: &str, default: f64) -> f64 {
        let value = self.parse_or_default(key, default);
        if (0.0..=100.0).contains(&value) {
            value
        } else {
            warn!(config_key = key, value = value, "百分比配置超出范围，使用默认值");
            default
        }
    }

    /// 列表配置（逗号分隔，去空白，去空项）
    fn list_or_default(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.get_config_value(key) {
            None => default.iter().map(|s| s.to_string()).collect(),
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn value_to_config_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_config_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

// ==========================================
// AnalyticsConfigReader Trait 实现
// ==========================================
impl AnalyticsConfigReader for ConfigManager {
    // ===== 排名配置 =====

    fn get_top_n(&self) -> usize {
        self.parse_or_default(config_keys::TOP_N, 5)
    }

    fn get_min_volume(&self) -> u64 {
        self.parse_or_default(config_keys::MIN_VOLUME, 10)
    }

    fn get_detail_top_n(&self) -> usize {
        self.parse_or_default(config_keys::DETAIL_TOP_N, 10)
    }

    // ===== 交付配置 =====

    fn get_on_time_target_pct(&self) -> f64 {
        self.percent_or_default(config_keys::ON_TIME_TARGET_PCT, 97.0)
    }

    // ===== 告警配置 =====

    fn get_concentration_params(&self) -> ConcentrationParams {
        let defaults = ConcentrationParams::default();
        let excluded: Vec<&str> = defaults
            .excluded_inspectors
            .iter()
            .map(|s| s.as_str())
            .collect();

        ConcentrationParams {
            threshold_pct: self
                .percent_or_default(config_keys::CONCENTRATION_THRESHOLD_PCT, defaults.threshold_pct),
            min_orders: self
                .parse_or_default(config_keys::CONCENTRATION_MIN_ORDERS, defaults.min_orders),
            excluded_inspectors: self
                .list_or_default(config_keys::CONCENTRATION_EXCLUDED_INSPECTORS, &excluded),
        }
    }

    fn get_recurring_params(&self) -> RecurringParams {
        let defaults = RecurringParams::default();
        RecurringParams {
            window: self.parse_or_default(config_keys::RECURRING_WINDOW, defaults.window),
            top_n: self.parse_or_default(config_keys::RECURRING_TOP_N, defaults.top_n),
            min_appearances: self.parse_or_default(
                config_keys::RECURRING_MIN_APPEARANCES,
                defaults.min_appearances,
            ),
        }
    }

    fn get_insight_thresholds(&self) -> InsightThresholds {
        let d = InsightThresholds::default();
        InsightThresholds {
            pass_rate_good: self.percent_or_default(config_keys::INSIGHT_PASS_RATE_GOOD, d.pass_rate_good),
            pass_rate_warn: self.percent_or_default(config_keys::INSIGHT_PASS_RATE_WARN, d.pass_rate_warn),
            sewing_detection_good: self.percent_or_default(
                config_keys::INSIGHT_SEWING_DETECTION_GOOD,
                d.sewing_detection_good,
            ),
            sewing_detection_warn: self.percent_or_default(
                config_keys::INSIGHT_SEWING_DETECTION_WARN,
                d.sewing_detection_warn,
            ),
            high_fail_rate_pct: self
                .percent_or_default(config_keys::INSIGHT_HIGH_FAIL_RATE_PCT, d.high_fail_rate_pct),
            high_repair_rate_pct: self.percent_or_default(
                config_keys::INSIGHT_HIGH_REPAIR_RATE_PCT,
                d.high_repair_rate_pct,
            ),
        }
    }

    // ===== 数据识别配置 =====

    fn get_sku_catalog(&self) -> SkuCatalog {
        SkuCatalog::new(
            self.list_or_default(config_keys::SKU_COLOR_CODES, &DEFAULT_COLOR_CODES),
            self.list_or_default(config_keys::SKU_EXCEPTIONS, &DEFAULT_EXCEPTIONS),
        )
    }

    fn get_column_schema(&self) -> ColumnSchema {
        let Some(raw) = self.get_config_value(config_keys::COLUMN_SCHEMA) else {
            return ColumnSchema::default();
        };

        match serde_json::from_str::<ColumnSchema>(raw) {
            Ok(schema) if !schema.columns.is_empty() => schema,
            _ => {
                warn!(
                    config_key = config_keys::COLUMN_SCHEMA,
                    raw_value = %raw,
                    "列结构配置格式错误，使用 v1"
                );
                ColumnSchema::default()
            }
        }
    }

    // ===== 展示配置 =====

    fn get_locale(&self) -> String {
        let value = self.get_config_or_default(config_keys::LOCALE, "en");
        if SUPPORTED_LOCALES.contains(&value.as_str()) {
            value
        } else {
            warn!(config_key = config_keys::LOCALE, raw_value = %value, "不支持的语言，使用 en");
            "en".to_string()
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排名
    pub const TOP_N: &str = "top_n";
    pub const MIN_VOLUME: &str = "min_volume";
    pub const DETAIL_TOP_N: &str = "detail_top_n";

    // 交付
    pub const ON_TIME_TARGET_PCT: &str = "on_time_target_pct";

    // 集中度
    pub const CONCENTRATION_THRESHOLD_PCT: &str = "concentration_threshold_pct";
    pub const CONCENTRATION_MIN_ORDERS: &str = "concentration_min_orders";
    pub const CONCENTRATION_EXCLUDED_INSPECTORS: &str = "concentration_excluded_inspectors"; // 逗号分隔

    // 重复问题 SKU
    pub const RECURRING_WINDOW: &str = "recurring_window";
    pub const RECURRING_TOP_N: &str = "recurring_top_n";
    pub const RECURRING_MIN_APPEARANCES: &str = "recurring_min_appearances";

    // 洞察阈值
    pub const INSIGHT_PASS_RATE_GOOD: &str = "insight_pass_rate_good";
    pub const INSIGHT_PASS_RATE_WARN: &str = "insight_pass_rate_warn";
    pub const INSIGHT_SEWING_DETECTION_GOOD: &str = "insight_sewing_detection_good";
    pub const INSIGHT_SEWING_DETECTION_WARN: &str = "insight_sewing_detection_warn";
    pub const INSIGHT_HIGH_FAIL_RATE_PCT: &str = "insight_high_fail_rate_pct";
    pub const INSIGHT_HIGH_REPAIR_RATE_PCT: &str = "insight_high_repair_rate_pct";

    // SKU 识别
    pub const SKU_COLOR_CODES: &str = "sku_color_codes"; // 逗号分隔
    pub const SKU_EXCEPTIONS: &str = "sku_exceptions"; // 逗号分隔

    // 列结构 (JSON)
    pub const COLUMN_SCHEMA: &str = "column_schema";

    // 语言
    pub const LOCALE: &str = "locale";
}
