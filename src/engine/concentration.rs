// ==========================================
// QC 检验分析引擎 - 检验员集中度告警
// ==========================================
// 规则:
// - 只看去重订单数 >= min_orders 的母 SKU
// - 集中度 = 检验员在该 SKU 的去重订单数 / 该 SKU 去重订单数 × 100
// - 严格大于阈值才告警
// - 排除名单（子串，不区分大小写）与空检验员从不告警
// - 按集中度降序
// ==========================================

use crate::domain::{ConcentrationAlert, InspectionRecord};
use crate::engine::metrics::round_to;
use crate::engine::sku::SkuNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationParams {
    /// 告警阈值（%，严格大于）
    pub threshold_pct: f64,
    /// 母 SKU 最少去重订单数（含）
    pub min_orders: usize,
    /// 不参与告警的检验员名称子串
    pub excluded_inspectors: Vec<String>,
}

impl Default for ConcentrationParams {
    fn default() -> Self {
        Self {
            threshold_pct: 50.0,
            min_orders: 10,
            excluded_inspectors: vec!["PA/SEWING".to_string()],
        }
    }
}

/// 检验员是否在排除名单中（子串匹配，不区分大小写）
pub fn is_excluded_inspector(inspector: &str, excluded: &[String]) -> bool {
    let name = inspector.to_uppercase();
    excluded
        .iter()
        .filter(|pattern| !pattern.trim().is_empty())
        .any(|pattern| name.contains(&pattern.to_uppercase()))
}

/// 集中度告警
pub fn concentration_alerts(
    records: &[InspectionRecord],
    normalizer: &SkuNormalizer,
    params: &ConcentrationParams,
) -> Vec<ConcentrationAlert> {
    // 母 SKU → (全部订单, 检验员 → 订单)
    let mut by_sku: BTreeMap<String, (BTreeSet<&str>, BTreeMap<&str, BTreeSet<&str>>)> =
        BTreeMap::new();
    for record in records {
        let entry = by_sku.entry(normalizer.parent_sku(&record.sku)).or_default();
        entry.0.insert(record.order_number.as_str());
        entry
            .1
            .entry(record.inspector.as_str())
            .or_default()
            .insert(record.order_number.as_str());
    }

    let mut alerts = Vec::new();
    for (parent_sku, (orders, by_inspector)) in by_sku {
        let total = orders.len();
        if total < params.min_orders {
            continue;
        }

        for (inspector, inspector_orders) in by_inspector {
            if inspector.trim().is_empty()
                || is_excluded_inspector(inspector, &params.excluded_inspectors)
            {
                continue;
            }

            let share = inspector_orders.len() as f64 / total as f64 * 100.0;
            if share > params.threshold_pct {
                alerts.push(ConcentrationAlert {
                    inspector: inspector.to_string(),
                    parent_sku: parent_sku.clone(),
                    inspector_sku_orders: inspector_orders.len(),
                    total_sku_orders: total,
                    concentration_pct: round_to(share, 1),
                });
            }
        }
    }

    alerts.sort_by(|a, b| b.concentration_pct.total_cmp(&a.concentration_pct));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order: usize, inspector: &str, sku: &str) -> InspectionRecord {
        InspectionRecord {
            order_number: format!("SO-{}", order),
            lot_number: String::new(),
            due_date: None,
            finished_date: None,
            sku: sku.to_string(),
            quantity: 10,
            repairs: 0,
            repair_pct: None,
            scrap: 0,
            pass_pct: None,
            final_qty: 10,
            inspector: inspector.to_string(),
            red_flag: false,
            ncr_complete: false,
            qc_fail: 0,
            sewing_fail: 0,
            stream: "SS".to_string(),
            notes: String::new(),
            period: "JAN26".to_string(),
        }
    }

    fn split(main: &str, main_orders: usize, other: &str) -> Vec<InspectionRecord> {
        (0..10)
            .map(|i| record(i, if i < main_orders { main } else { other }, "AC-HK-BK"))
            .collect()
    }

    #[test]
    fn test_over_threshold_flagged() {
        let alerts = concentration_alerts(
            &split("ANA", 6, "BEA"),
            &SkuNormalizer::default(),
            &ConcentrationParams::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].inspector, "ANA");
        assert_eq!(alerts[0].parent_sku, "AC-HK");
        assert_eq!(alerts[0].concentration_pct, 60.0);
        assert_eq!(alerts[0].total_sku_orders, 10);
    }

    #[test]
    fn test_exactly_threshold_not_flagged() {
        let alerts = concentration_alerts(
            &split("ANA", 5, "BEA"),
            &SkuNormalizer::default(),
            &ConcentrationParams::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_excluded_inspector_never_flagged() {
        let alerts = concentration_alerts(
            &split("pa/sewing asst", 9, "BEA"),
            &SkuNormalizer::default(),
            &ConcentrationParams::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_below_volume_floor() {
        let records: Vec<InspectionRecord> = (0..9).map(|i| record(i, "ANA", "AC-HK")).collect();
        let alerts = concentration_alerts(
            &records,
            &SkuNormalizer::default(),
            &ConcentrationParams::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_is_excluded_inspector() {
        let excluded = vec!["PA/SEWING".to_string()];
        assert!(is_excluded_inspector("PA/SEWING ASST", &excluded));
        assert!(is_excluded_inspector("Pa/Sewing", &excluded));
        assert!(!is_excluded_inspector("ANA", &excluded));
        assert!(!is_excluded_inspector("ANA", &[String::new()]));
    }
}
