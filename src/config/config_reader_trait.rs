// ==========================================
// QC 检验分析引擎 - 分析配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::analytics_config::AnalyticsConfig;
use crate::engine::concentration::ConcentrationParams;
use crate::engine::insight::InsightThresholds;
use crate::engine::recurring::RecurringParams;
use crate::engine::sku::SkuCatalog;
use crate::importer::ColumnSchema;

// ==========================================
// AnalyticsConfigReader Trait
// ==========================================
// 用途: 引擎所需的配置读取接口
// 实现者: ConfigManager（键值配置，缺失或格式错误时回退默认值）
pub trait AnalyticsConfigReader: Send + Sync {
    // ===== 排名配置 =====

    /// 问题 SKU 排名行数
    ///
    /// # 默认值
    /// - 5
    fn get_top_n(&self) -> usize;

    /// 按比率排名的最小检验数量
    ///
    /// # 默认值
    /// - 10
    fn get_min_volume(&self) -> u64;

    /// 明细表行数（缝纫问题 / 返修 SKU）
    ///
    /// # 默认值
    /// - 10
    fn get_detail_top_n(&self) -> usize;

    // ===== 交付配置 =====

    /// 准时率目标（%）
    ///
    /// # 默认值
    /// - 97.0
    fn get_on_time_target_pct(&self) -> f64;

    // ===== 告警配置 =====

    /// 集中度告警参数
    ///
    /// # 默认值
    /// - 阈值 50%，最少 10 单，排除 PA/SEWING
    fn get_concentration_params(&self) -> ConcentrationParams;

    /// 重复问题 SKU 扫描参数
    ///
    /// # 默认值
    /// - 窗口 6，Top 5，至少 3 次
    fn get_recurring_params(&self) -> RecurringParams;

    /// 洞察阈值
    fn get_insight_thresholds(&self) -> InsightThresholds;

    // ===== 数据识别配置 =====

    /// 颜色词表 + 例外 SKU
    fn get_sku_catalog(&self) -> SkuCatalog;

    /// 列结构
    ///
    /// # 默认值
    /// - v1（前 18 列）
    fn get_column_schema(&self) -> ColumnSchema;

    // ===== 展示配置 =====

    /// 洞察文本语言
    ///
    /// # 默认值
    /// - en
    fn get_locale(&self) -> String;

    /// 汇总为一次分析使用的参数快照
    fn load_analytics_config(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            top_n: self.get_top_n(),
            min_volume: self.get_min_volume(),
            detail_top_n: self.get_detail_top_n(),
            on_time_target_pct: self.get_on_time_target_pct(),
            concentration: self.get_concentration_params(),
            recurring: self.get_recurring_params(),
            insights: self.get_insight_thresholds(),
            sku_catalog: self.get_sku_catalog(),
            column_schema: self.get_column_schema(),
            locale: self.get_locale(),
        }
    }
}
