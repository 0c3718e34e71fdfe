// ==========================================
// QC 检验分析引擎 - 洞察生成器
// ==========================================
// 职责: 对已计算的聚合结果做固定阈值判断，输出有序文本
// 顺序（每项至多一行）:
// 1. 合格率分档
// 2. 缝纫环节发现率分档
// 3. 红旗（客诉）数 > 0
// 4. 不合格率超阈值的 SKU 数（按不合格率排名中）
// 5. 返修率超阈值
// 文本通过 rust-i18n 本地化，语言由生成器实例显式指定
// ==========================================

use crate::domain::{InspectorPerformanceRow, OnTimeMetrics, ProblemSkuRollups, SummaryMetrics};
use crate::i18n::t_locale_with_args;
use serde::{Deserialize, Serialize};

/// 洞察阈值（%）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    pub pass_rate_good: f64,
    pub pass_rate_warn: f64,
    pub sewing_detection_good: f64,
    pub sewing_detection_warn: f64,
    pub high_fail_rate_pct: f64,
    pub high_repair_rate_pct: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            pass_rate_good: 98.0,
            pass_rate_warn: 95.0,
            sewing_detection_good: 70.0,
            sewing_detection_warn: 50.0,
            high_fail_rate_pct: 5.0,
            high_repair_rate_pct: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsightGenerator {
    thresholds: InsightThresholds,
    locale: String,
}

impl InsightGenerator {
    pub fn new(thresholds: InsightThresholds, locale: impl Into<String>) -> Self {
        Self {
            thresholds,
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn text(&self, key: &str, args: &[(&str, &str)]) -> String {
        t_locale_with_args(&self.locale, key, args)
    }

    /// 生成洞察
    ///
    /// # 参数
    /// - summary: 汇总指标
    /// - problem_skus: 问题 SKU 排名
    /// - _inspector_rollup: 检验员汇总（当前规则未使用）
    pub fn generate(
        &self,
        summary: &SummaryMetrics,
        problem_skus: &ProblemSkuRollups,
        _inspector_rollup: &[InspectorPerformanceRow],
    ) -> Vec<String> {
        let th = &self.thresholds;
        let mut insights = Vec::new();

        // 1. 合格率
        let pass_rate = format!("{:.1}", summary.pass_rate);
        let key = if summary.pass_rate >= th.pass_rate_good {
            "insight.pass_rate.good"
        } else if summary.pass_rate >= th.pass_rate_warn {
            "insight.pass_rate.warn"
        } else {
            "insight.pass_rate.critical"
        };
        insights.push(self.text(key, &[("rate", pass_rate.as_str())]));

        // 2. 缝纫环节发现率
        insights.push(self.sewing_detection_insight(summary));

        // 3. 红旗
        if summary.total_red_flags > 0 {
            let count = summary.total_red_flags.to_string();
            insights.push(self.text("insight.red_flags", &[("count", count.as_str())]));
        }

        // 4. 高不合格率 SKU
        let high_fail = problem_skus
            .by_fail_rate
            .iter()
            .filter(|row| row.fail_rate > th.high_fail_rate_pct)
            .count();
        if high_fail > 0 {
            let count = high_fail.to_string();
            let threshold = th.high_fail_rate_pct.to_string();
            insights.push(self.text(
                "insight.high_fail_skus",
                &[("count", count.as_str()), ("threshold", threshold.as_str())],
            ));
        }

        // 5. 返修率
        if summary.repair_rate > th.high_repair_rate_pct {
            let rate = format!("{:.1}", summary.repair_rate);
            insights.push(self.text("insight.high_repair_rate", &[("rate", rate.as_str())]));
        }

        insights
    }

    /// 缝纫环节发现率分级（缝纫经理视图单独展示）
    pub fn sewing_detection_insight(&self, summary: &SummaryMetrics) -> String {
        let th = &self.thresholds;
        let detection = format!("{:.0}", summary.sewing_detection_rate);
        let key = if summary.sewing_detection_rate >= th.sewing_detection_good {
            "insight.sewing.good"
        } else if summary.sewing_detection_rate >= th.sewing_detection_warn {
            "insight.sewing.warn"
        } else {
            "insight.sewing.critical"
        };
        self.text(key, &[("rate", detection.as_str())])
    }

    /// 准时交付洞察（不属于五项固定检查）
    pub fn delivery_insight(&self, on_time: &OnTimeMetrics) -> String {
        let rate = format!("{:.1}", on_time.on_time_rate);
        let target = format!("{:.1}", on_time.target_rate);
        if on_time.meets_target {
            self.text("insight.on_time.good", &[("rate", rate.as_str())])
        } else {
            self.text("insight.on_time.below", &[("rate", rate.as_str()), ("target", target.as_str())])
        }
    }

    /// 触碰率洞察
    pub fn touch_rate_insight(&self, average_touch_rate: f64) -> String {
        let rate = format!("{:.1}", average_touch_rate);
        self.text("insight.touch_rate", &[("rate", rate.as_str())])
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(InsightThresholds::default(), "en")
    }
}
