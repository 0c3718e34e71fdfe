// ==========================================
// QC 检验分析引擎 - 指标聚合器
// ==========================================
// 职责: 汇总指标 / 母 SKU 汇总 / 检验员汇总 / 月度趋势 / 红旗分析
// 输入: 只读检验记录集合
// 输出: 每次调用重新计算的结果快照（不修改输入）
// 规则:
// - total_fails = scrap（QC / 缝纫不合格只说明在哪个环节发现）
// - 比率 = 分子 / quantity × 100，quantity 为 0 时为 0
// - 分组键按升序排列，排序稳定，并列时按分组键升序
// ==========================================

use crate::domain::{
    InspectionRecord, InspectorPerformanceRow, MonthlyTrendExtendedRow, MonthlyTrendRow,
    ProblemSkuRollups, RedFlagOrderRow, RedFlagSkuRow, RepairSkuRow, SewingIssueRow, SkuRollupRow,
    SummaryMetrics,
};
use crate::engine::calendar;
use crate::engine::sku::SkuNormalizer;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// 百分比（分母为 0 时为 0）
pub fn rate(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// 四舍五入到 dp 位小数
pub fn round_to(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

/// 降序比较（f64）
fn desc_f64(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

// ==========================================
// 分组累加器
// ==========================================
#[derive(Debug, Default)]
struct GroupTotals {
    quantity: u64,
    final_qty: u64,
    repairs: u64,
    scrap: u64,
    qc_fail: u64,
    sewing_fail: u64,
    orders: BTreeSet<String>,
    red_flags: usize,
    ncr_complete: usize,
}

impl GroupTotals {
    fn add(&mut self, record: &InspectionRecord) {
        self.quantity += record.quantity;
        self.final_qty += record.final_qty;
        self.repairs += record.repairs;
        self.scrap += record.scrap;
        self.qc_fail += record.qc_fail;
        self.sewing_fail += record.sewing_fail;
        self.orders.insert(record.order_number.clone());
        if record.red_flag {
            self.red_flags += 1;
        }
        if record.ncr_complete {
            self.ncr_complete += 1;
        }
    }
}

fn group_by<'a, F>(records: &'a [InspectionRecord], mut key: F) -> BTreeMap<String, GroupTotals>
where
    F: FnMut(&'a InspectionRecord) -> String,
{
    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

// ==========================================
// MetricsAggregator
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    normalizer: SkuNormalizer,
}

impl MetricsAggregator {
    pub fn new(normalizer: SkuNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &SkuNormalizer {
        &self.normalizer
    }

    // ==========================================
    // 汇总指标
    // ==========================================

    pub fn summary(&self, records: &[InspectionRecord]) -> SummaryMetrics {
        let mut totals = GroupTotals::default();
        for record in records {
            totals.add(record);
        }

        SummaryMetrics {
            total_inspected: totals.quantity,
            total_passed: totals.final_qty,
            total_repairs: totals.repairs,
            total_scrap: totals.scrap,
            total_qc_fails: totals.qc_fail,
            total_sewing_fails: totals.sewing_fail,
            total_fails: totals.scrap,
            total_orders: totals.orders.len(),
            total_red_flags: totals.red_flags,
            pass_rate: rate(totals.final_qty, totals.quantity),
            fail_rate: rate(totals.scrap, totals.quantity),
            repair_rate: rate(totals.repairs, totals.quantity),
            scrap_rate: rate(totals.scrap, totals.quantity),
            sewing_detection_rate: rate(totals.sewing_fail, totals.scrap),
        }
    }

    // ==========================================
    // 母 SKU 汇总
    // ==========================================

    /// 按母 SKU 分组（按母 SKU 升序）
    pub fn rollup_by_parent_sku(&self, records: &[InspectionRecord]) -> Vec<SkuRollupRow> {
        group_by(records, |r| self.normalizer.parent_sku(&r.sku))
            .into_iter()
            .map(|(parent_sku, t)| SkuRollupRow {
                parent_sku,
                quantity: t.quantity,
                final_qty: t.final_qty,
                repairs: t.repairs,
                scrap: t.scrap,
                qc_fail: t.qc_fail,
                sewing_fail: t.sewing_fail,
                total_fails: t.scrap,
                fail_rate: round_to(rate(t.scrap, t.quantity), 2),
                repair_rate: round_to(rate(t.repairs, t.quantity), 2),
            })
            .collect()
    }

    /// 问题 SKU
    ///
    /// # 参数
    /// - top_n: 每种排名的行数
    /// - min_volume: 按不合格率排名时的最小检验数量（含）
    ///
    /// # 返回
    /// - by_fail_count: 按不合格数降序（无产量门槛）
    /// - by_fail_rate: 按不合格率降序（quantity >= min_volume）
    pub fn problem_skus(
        &self,
        records: &[InspectionRecord],
        top_n: usize,
        min_volume: u64,
    ) -> ProblemSkuRollups {
        let rollup = self.rollup_by_parent_sku(records);

        let mut by_fail_count = rollup.clone();
        by_fail_count.sort_by(|a, b| b.total_fails.cmp(&a.total_fails));
        by_fail_count.truncate(top_n);

        let mut by_fail_rate: Vec<SkuRollupRow> = rollup
            .into_iter()
            .filter(|row| row.quantity >= min_volume)
            .collect();
        by_fail_rate.sort_by(|a, b| desc_f64(a.fail_rate, b.fail_rate));
        by_fail_rate.truncate(top_n);

        debug!(
            by_count = by_fail_count.len(),
            by_rate = by_fail_rate.len(),
            "问题 SKU 排名完成"
        );

        ProblemSkuRollups {
            by_fail_count,
            by_fail_rate,
        }
    }

    /// 返修最多的 SKU（quantity >= min_volume）
    pub fn top_repair_skus(
        &self,
        records: &[InspectionRecord],
        top_n: usize,
        min_volume: u64,
    ) -> Vec<RepairSkuRow> {
        let mut rows: Vec<RepairSkuRow> = self
            .rollup_by_parent_sku(records)
            .into_iter()
            .filter(|row| row.quantity >= min_volume)
            .map(repair_row)
            .collect();
        rows.sort_by(|a, b| b.repairs.cmp(&a.repairs));
        rows.truncate(top_n);
        rows
    }

    /// 有返修的母 SKU（无产量门槛）
    pub fn repairs_by_parent_sku(
        &self,
        records: &[InspectionRecord],
        top_n: usize,
    ) -> Vec<RepairSkuRow> {
        let mut rows: Vec<RepairSkuRow> = self
            .rollup_by_parent_sku(records)
            .into_iter()
            .filter(|row| row.repairs > 0)
            .map(repair_row)
            .collect();
        rows.sort_by(|a, b| b.repairs.cmp(&a.repairs));
        rows.truncate(top_n);
        rows
    }

    /// 缝纫环节发现不合格的母 SKU
    pub fn sewing_issues(&self, records: &[InspectionRecord], top_n: usize) -> Vec<SewingIssueRow> {
        let mut rows: Vec<SewingIssueRow> = self
            .rollup_by_parent_sku(records)
            .into_iter()
            .filter(|row| row.sewing_fail > 0)
            .map(|row| SewingIssueRow {
                sewing_fail_rate: round_to(rate(row.sewing_fail, row.quantity), 2),
                parent_sku: row.parent_sku,
                quantity: row.quantity,
                sewing_fail: row.sewing_fail,
                qc_fail: row.qc_fail,
            })
            .collect();
        rows.sort_by(|a, b| b.sewing_fail.cmp(&a.sewing_fail));
        rows.truncate(top_n);
        rows
    }

    // ==========================================
    // 检验员汇总
    // ==========================================

    /// 检验员绩效（按检验数量降序）
    pub fn inspector_performance(&self, records: &[InspectionRecord]) -> Vec<InspectorPerformanceRow> {
        let mut rows: Vec<InspectorPerformanceRow> = group_by(records, |r| r.inspector.clone())
            .into_iter()
            .map(|(inspector, t)| InspectorPerformanceRow {
                inspector,
                quantity: t.quantity,
                final_qty: t.final_qty,
                repairs: t.repairs,
                scrap: t.scrap,
                qc_fail: t.qc_fail,
                sewing_fail: t.sewing_fail,
                orders: t.orders.len(),
                red_flags: t.red_flags,
                pass_rate: round_to(rate(t.final_qty, t.quantity), 2),
                total_fails: t.scrap,
            })
            .collect();
        rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        rows
    }

    /// 在最近所选月份有记录的检验员（不含空名，按名称升序）
    pub fn active_inspectors(&self, records: &[InspectionRecord], selected: &[String]) -> Vec<String> {
        let Some(latest) = calendar::latest(selected) else {
            return Vec::new();
        };

        records
            .iter()
            .filter(|r| r.period == latest && !r.inspector.is_empty())
            .map(|r| r.inspector.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // ==========================================
    // 月度趋势
    // ==========================================

    /// 月度趋势（按日历顺序）
    pub fn monthly_trends(&self, records: &[InspectionRecord]) -> Vec<MonthlyTrendRow> {
        self.monthly_trends_extended(records)
            .into_iter()
            .map(|row| row.base)
            .collect()
    }

    /// 月度趋势（扩展: NCR / 红旗 / 返工 / 触碰率）
    pub fn monthly_trends_extended(&self, records: &[InspectionRecord]) -> Vec<MonthlyTrendExtendedRow> {
        let mut groups: Vec<(String, GroupTotals)> =
            group_by(records, |r| r.period.clone()).into_iter().collect();
        groups.sort_by_key(|(period, _)| calendar::sort_key(period).unwrap_or((i32::MIN, 0)));

        groups
            .into_iter()
            .map(|(period, t)| MonthlyTrendExtendedRow {
                base: MonthlyTrendRow {
                    period,
                    quantity: t.quantity,
                    final_qty: t.final_qty,
                    repairs: t.repairs,
                    scrap: t.scrap,
                    qc_fail: t.qc_fail,
                    sewing_fail: t.sewing_fail,
                    orders: t.orders.len(),
                    pass_rate: round_to(rate(t.final_qty, t.quantity), 2),
                    fail_rate: round_to(rate(t.scrap, t.quantity), 2),
                    repair_rate: round_to(rate(t.repairs, t.quantity), 2),
                    total_fails: t.scrap,
                },
                ncr_count: t.ncr_complete,
                red_flags: t.red_flags,
                total_reworks: t.repairs,
                touch_rate: round_to(rate(t.repairs + t.scrap, t.quantity), 2),
            })
            .collect()
    }

    // ==========================================
    // 红旗分析
    // ==========================================

    /// 红旗（客诉）按母 SKU 汇总，按红旗行数降序；无红旗 → 空
    pub fn red_flag_analysis(&self, records: &[InspectionRecord]) -> Vec<RedFlagSkuRow> {
        let flagged: Vec<InspectionRecord> = records.iter().filter(|r| r.red_flag).cloned().collect();
        if flagged.is_empty() {
            return Vec::new();
        }

        let mut rows: Vec<RedFlagSkuRow> = group_by(&flagged, |r| self.normalizer.parent_sku(&r.sku))
            .into_iter()
            .map(|(parent_sku, t)| RedFlagSkuRow {
                parent_sku,
                orders: t.orders.len(),
                red_flag_count: t.red_flags,
            })
            .collect();
        rows.sort_by(|a, b| b.red_flag_count.cmp(&a.red_flag_count));
        rows
    }

    /// 红旗订单明细（保持记录原始顺序）
    pub fn red_flag_orders(&self, records: &[InspectionRecord]) -> Vec<RedFlagOrderRow> {
        records
            .iter()
            .filter(|r| r.red_flag)
            .map(|r| RedFlagOrderRow {
                order_number: r.order_number.clone(),
                sku: r.sku.clone(),
                inspector: r.inspector.clone(),
                quantity: r.quantity,
                ncr_complete: r.ncr_complete,
                period: r.period.clone(),
            })
            .collect()
    }
}

fn repair_row(row: SkuRollupRow) -> RepairSkuRow {
    RepairSkuRow {
        parent_sku: row.parent_sku,
        quantity: row.quantity,
        repairs: row.repairs,
        repair_rate: row.repair_rate,
    }
}

/// 平均触碰率（各月触碰率的算术平均，无数据 → 0）
pub fn average_touch_rate(rows: &[MonthlyTrendExtendedRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|r| r.touch_rate).sum::<f64>() / rows.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order: &str, sku: &str, period: &str, quantity: u64, scrap: u64) -> InspectionRecord {
        InspectionRecord {
            order_number: order.to_string(),
            lot_number: String::new(),
            due_date: None,
            finished_date: None,
            sku: sku.to_string(),
            quantity,
            repairs: 0,
            repair_pct: None,
            scrap,
            pass_pct: None,
            final_qty: quantity - scrap,
            inspector: "ANA".to_string(),
            red_flag: false,
            ncr_complete: false,
            qc_fail: 0,
            sewing_fail: 0,
            stream: "SS".to_string(),
            notes: String::new(),
            period: period.to_string(),
        }
    }

    #[test]
    fn test_rate_safe_division() {
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(rate(5, 100), 5.0);
        assert_eq!(round_to(95.33333, 2), 95.33);
        assert_eq!(round_to(66.66666, 1), 66.7);
    }

    #[test]
    fn test_summary_total_fails_is_scrap() {
        let mut r = record("SO-1", "AC-HK", "JAN26", 100, 5);
        r.qc_fail = 2;
        r.sewing_fail = 3;
        r.repairs = 4;
        let summary = MetricsAggregator::default().summary(&[r]);

        assert_eq!(summary.total_fails, 5);
        assert_eq!(summary.total_qc_fails, 2);
        assert_eq!(summary.fail_rate, 5.0);
        assert_eq!(summary.repair_rate, 4.0);
        assert_eq!(summary.sewing_detection_rate, 60.0);
    }

    #[test]
    fn test_summary_empty_is_zero() {
        let summary = MetricsAggregator::default().summary(&[]);
        assert_eq!(summary, SummaryMetrics::default());
    }

    #[test]
    fn test_summary_distinct_orders_and_flags() {
        let mut a = record("SO-1", "AC-HK", "JAN26", 10, 0);
        a.red_flag = true;
        let b = record("SO-1", "AC-HK-BK", "JAN26", 10, 0);
        let summary = MetricsAggregator::default().summary(&[a, b]);
        assert_eq!(summary.total_orders, 1);
        assert_eq!(summary.total_red_flags, 1);
    }

    #[test]
    fn test_problem_skus_rollup_colors() {
        let records = vec![
            record("SO-1", "AC-HK-BK", "JAN26", 100, 10),
            record("SO-2", "AC-HK-RG", "JAN26", 100, 2),
            record("SO-3", "PC-F20-BK-LG", "JAN26", 5, 3),
        ];
        let rollups = MetricsAggregator::default().problem_skus(&records, 5, 10);

        assert_eq!(rollups.by_fail_count[0].parent_sku, "AC-HK");
        assert_eq!(rollups.by_fail_count[0].total_fails, 12);
        assert_eq!(rollups.by_fail_count[0].fail_rate, 6.0);
        assert_eq!(rollups.by_fail_count.len(), 2);

        // PC-F20-LG 低于产量门槛
        assert_eq!(rollups.by_fail_rate.len(), 1);
        assert_eq!(rollups.by_fail_rate[0].parent_sku, "AC-HK");
    }

    #[test]
    fn test_problem_skus_tie_break_by_parent_sku() {
        let records = vec![
            record("SO-1", "ZZ-1", "JAN26", 100, 5),
            record("SO-2", "AA-1", "JAN26", 100, 5),
        ];
        let rollups = MetricsAggregator::default().problem_skus(&records, 5, 10);
        let skus: Vec<&str> = rollups.by_fail_count.iter().map(|r| r.parent_sku.as_str()).collect();
        assert_eq!(skus, vec!["AA-1", "ZZ-1"]);
    }

    #[test]
    fn test_top_repair_skus_volume_gated() {
        let mut a = record("SO-1", "AC-HK", "JAN26", 100, 0);
        a.repairs = 3;
        let mut b = record("SO-2", "PI-CB", "JAN26", 5, 0);
        b.repairs = 4;
        let aggregator = MetricsAggregator::default();

        let gated = aggregator.top_repair_skus(&[a.clone(), b.clone()], 5, 10);
        assert_eq!(gated.len(), 1);
        assert_eq!(gated[0].parent_sku, "AC-HK");
        assert_eq!(gated[0].repair_rate, 3.0);

        let all = aggregator.repairs_by_parent_sku(&[a, b], 10);
        assert_eq!(all[0].parent_sku, "PI-CB");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_inspector_performance_ordering() {
        let mut a = record("SO-1", "AC-HK", "JAN26", 10, 1);
        a.inspector = "BEA".to_string();
        let b = record("SO-2", "AC-HK", "JAN26", 50, 1);
        let rows = MetricsAggregator::default().inspector_performance(&[a, b]);

        assert_eq!(rows[0].inspector, "ANA");
        assert_eq!(rows[0].pass_rate, 98.0);
        assert_eq!(rows[1].inspector, "BEA");
        assert_eq!(rows[1].orders, 1);
    }

    #[test]
    fn test_monthly_trends_calendar_order() {
        let records = vec![
            record("SO-1", "AC-HK", "FEB26", 10, 1),
            record("SO-2", "AC-HK", "DEC25", 10, 0),
            record("SO-3", "AC-HK", "JAN26", 10, 0),
        ];
        let periods: Vec<String> = MetricsAggregator::default()
            .monthly_trends(&records)
            .into_iter()
            .map(|r| r.period)
            .collect();
        assert_eq!(periods, vec!["DEC25", "JAN26", "FEB26"]);
    }

    #[test]
    fn test_monthly_trends_extended_touch_rate() {
        let mut r = record("SO-1", "AC-HK", "JAN26", 200, 6);
        r.repairs = 4;
        r.ncr_complete = true;
        let rows = MetricsAggregator::default().monthly_trends_extended(&[r]);

        assert_eq!(rows[0].touch_rate, 5.0);
        assert_eq!(rows[0].ncr_count, 1);
        assert_eq!(rows[0].total_reworks, 4);
        assert_eq!(average_touch_rate(&rows), 5.0);
        assert_eq!(average_touch_rate(&[]), 0.0);
    }

    #[test]
    fn test_red_flag_analysis() {
        let aggregator = MetricsAggregator::default();
        assert!(aggregator
            .red_flag_analysis(&[record("SO-1", "AC-HK", "JAN26", 10, 0)])
            .is_empty());

        let mut a = record("SO-1", "AC-HK-BK", "JAN26", 10, 0);
        a.red_flag = true;
        let mut b = record("SO-1", "AC-HK-RG", "JAN26", 10, 0);
        b.red_flag = true;
        let mut c = record("SO-3", "PI-CB", "JAN26", 10, 0);
        c.red_flag = true;

        let rows = aggregator.red_flag_analysis(&[c, a, b]);
        assert_eq!(rows[0].parent_sku, "AC-HK");
        assert_eq!(rows[0].red_flag_count, 2);
        assert_eq!(rows[0].orders, 1);
        assert_eq!(rows[1].parent_sku, "PI-CB");

        let mut flagged = record("SO-9", "AC-HK-BK", "JAN26", 10, 0);
        flagged.red_flag = true;
        flagged.ncr_complete = true;
        let orders = aggregator.red_flag_orders(&[record("SO-8", "AC-HK", "JAN26", 10, 0), flagged]);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_number, "SO-9");
        assert_eq!(orders[0].sku, "AC-HK-BK");
        assert!(orders[0].ncr_complete);
    }

    #[test]
    fn test_sewing_issues() {
        let mut a = record("SO-1", "AC-HK", "JAN26", 50, 2);
        a.sewing_fail = 2;
        let b = record("SO-2", "PI-CB", "JAN26", 50, 2);
        let rows = MetricsAggregator::default().sewing_issues(&[a, b], 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sewing_fail_rate, 4.0);
    }

    #[test]
    fn test_active_inspectors() {
        let mut a = record("SO-1", "AC-HK", "JAN26", 10, 0);
        a.inspector = "OLD".to_string();
        let b = record("SO-2", "AC-HK", "FEB26", 10, 0);
        let mut c = record("SO-3", "AC-HK", "FEB26", 10, 0);
        c.inspector = String::new();

        let selected = vec!["FEB26".to_string(), "JAN26".to_string()];
        let active = MetricsAggregator::default().active_inspectors(&[a, b, c], &selected);
        assert_eq!(active, vec!["ANA".to_string()]);
    }
}
