// ==========================================
// QC 检验分析引擎 - 分析参数
// ==========================================
// 职责: 引擎一次分析所需的全部可调参数（只读快照）
// 来源: AnalyticsConfigReader（默认实现为 ConfigManager）
// ==========================================

use crate::engine::concentration::ConcentrationParams;
use crate::engine::delivery::DEFAULT_ON_TIME_TARGET;
use crate::engine::insight::InsightThresholds;
use crate::engine::recurring::RecurringParams;
use crate::engine::sku::SkuCatalog;
use crate::importer::ColumnSchema;
use serde::{Deserialize, Serialize};

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    // ===== 排名 =====
    /// 问题 SKU / 返修 SKU 排名行数
    pub top_n: usize,
    /// 按比率排名的最小检验数量（含）
    pub min_volume: u64,
    /// 缝纫问题 / 返修明细表行数
    pub detail_top_n: usize,

    // ===== 交付 =====
    pub on_time_target_pct: f64,

    // ===== 告警与扫描 =====
    pub concentration: ConcentrationParams,
    pub recurring: RecurringParams,
    pub insights: InsightThresholds,

    // ===== 数据识别 =====
    pub sku_catalog: SkuCatalog,
    pub column_schema: ColumnSchema,

    // ===== 展示 =====
    pub locale: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            min_volume: 10,
            detail_top_n: 10,
            on_time_target_pct: DEFAULT_ON_TIME_TARGET,
            concentration: ConcentrationParams::default(),
            recurring: RecurringParams::default(),
            insights: InsightThresholds::default(),
            sku_catalog: SkuCatalog::default(),
            column_schema: ColumnSchema::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}
