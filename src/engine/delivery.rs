// ==========================================
// QC 检验分析引擎 - 准时交付指标
// ==========================================
// 规则:
// - 无交期 → 不计入分母，单独计数
// - 延迟天数 = 完成日期 - 交期（自然日），> 0 为延迟
// - 有交期但无完成日期 → 计入分母，视为准时，单独计数
// - 准时率保留一位小数；平均延迟只对延迟记录求平均
// ==========================================

use crate::domain::{InspectionRecord, OnTimeMetrics};
use crate::engine::metrics::round_to;

/// 默认准时率目标（%）
pub const DEFAULT_ON_TIME_TARGET: f64 = 97.0;

/// 计算准时交付指标
///
/// # 参数
/// - records: 检验记录
/// - target_rate: 准时率目标（%）
pub fn on_time_metrics(records: &[InspectionRecord], target_rate: f64) -> OnTimeMetrics {
    let mut metrics = OnTimeMetrics {
        target_rate,
        ..Default::default()
    };

    for record in records {
        if record.due_date.is_none() {
            metrics.orders_missing_due_date += 1;
            continue;
        }

        metrics.eligible_orders += 1;
        match record.days_late() {
            Some(days) if days > 0 => {
                metrics.total_late_orders += 1;
                metrics.total_days_late += days;
            }
            Some(_) => {}
            None => metrics.orders_missing_finished_date += 1,
        }
    }

    if metrics.eligible_orders == 0 {
        return metrics;
    }

    metrics.on_time_orders = metrics.eligible_orders - metrics.total_late_orders;
    metrics.on_time_rate = round_to(
        metrics.on_time_orders as f64 / metrics.eligible_orders as f64 * 100.0,
        1,
    );
    if metrics.total_late_orders > 0 {
        metrics.avg_days_late = metrics.total_days_late as f64 / metrics.total_late_orders as f64;
    }
    metrics.meets_target = metrics.on_time_rate >= target_rate;
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(due: Option<(i32, u32, u32)>, finished: Option<(i32, u32, u32)>) -> InspectionRecord {
        let date = |d: (i32, u32, u32)| NaiveDate::from_ymd_opt(d.0, d.1, d.2);
        InspectionRecord {
            order_number: "SO-1".to_string(),
            lot_number: String::new(),
            due_date: due.and_then(date),
            finished_date: finished.and_then(date),
            sku: "AC-HK".to_string(),
            quantity: 10,
            repairs: 0,
            repair_pct: None,
            scrap: 0,
            pass_pct: None,
            final_qty: 10,
            inspector: "ANA".to_string(),
            red_flag: false,
            ncr_complete: false,
            qc_fail: 0,
            sewing_fail: 0,
            stream: "SS".to_string(),
            notes: String::new(),
            period: "JAN26".to_string(),
        }
    }

    #[test]
    fn test_late_and_missing_due_date() {
        let records = vec![
            record(Some((2026, 1, 10)), Some((2026, 1, 12))),
            record(None, Some((2026, 1, 12))),
        ];
        let m = on_time_metrics(&records, DEFAULT_ON_TIME_TARGET);

        assert_eq!(m.eligible_orders, 1);
        assert_eq!(m.total_late_orders, 1);
        assert_eq!(m.total_days_late, 2);
        assert_eq!(m.avg_days_late, 2.0);
        assert_eq!(m.on_time_rate, 0.0);
        assert_eq!(m.orders_missing_due_date, 1);
        assert!(!m.meets_target);
    }

    #[test]
    fn test_early_and_same_day_are_on_time() {
        let records = vec![
            record(Some((2026, 1, 10)), Some((2026, 1, 10))),
            record(Some((2026, 1, 10)), Some((2026, 1, 8))),
            record(Some((2026, 1, 10)), None),
        ];
        let m = on_time_metrics(&records, DEFAULT_ON_TIME_TARGET);

        assert_eq!(m.eligible_orders, 3);
        assert_eq!(m.on_time_orders, 3);
        assert_eq!(m.on_time_rate, 100.0);
        assert_eq!(m.avg_days_late, 0.0);
        assert_eq!(m.orders_missing_finished_date, 1);
        assert!(m.meets_target);
    }

    #[test]
    fn test_rate_rounded_to_one_decimal() {
        let records = vec![
            record(Some((2026, 1, 10)), Some((2026, 1, 11))),
            record(Some((2026, 1, 10)), Some((2026, 1, 10))),
            record(Some((2026, 1, 10)), Some((2026, 1, 10))),
        ];
        let m = on_time_metrics(&records, 60.0);
        assert_eq!(m.on_time_rate, 66.7);
        assert!(m.meets_target);
    }

    #[test]
    fn test_nothing_eligible_is_zero() {
        let m = on_time_metrics(&[record(None, None)], DEFAULT_ON_TIME_TARGET);
        assert_eq!(m.eligible_orders, 0);
        assert_eq!(m.on_time_rate, 0.0);
        assert_eq!(m.avg_days_late, 0.0);
        assert!(!m.meets_target);
    }
}
