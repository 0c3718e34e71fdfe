// ==========================================
// QC 检验分析引擎 - 反复出现的问题 SKU
// ==========================================
// 流程:
// 1. 参考月份 = 所选月份中最近的一个
// 2. 在可用月份上取回看窗口
// 3. 窗口内逐月独立加载，取不合格数 Top-N 的母 SKU（不合格数 > 0）
// 4. 统计出现次数，>= min_appearances 的输出
// 红线: 单月加载失败只跳过该月
// ==========================================

use crate::domain::RecurringSku;
use crate::engine::calendar;
use crate::engine::metrics::MetricsAggregator;
use crate::importer::{PeriodCache, SheetImporter, WorkbookSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringParams {
    /// 回看窗口（月）
    pub window: usize,
    /// 每月取不合格数前 N 名
    pub top_n: usize,
    /// 最少出现次数（含）
    pub min_appearances: usize,
}

impl Default for RecurringParams {
    fn default() -> Self {
        Self {
            window: 6,
            top_n: 5,
            min_appearances: 3,
        }
    }
}

pub struct RecurringScanner<'a> {
    importer: &'a SheetImporter,
    aggregator: &'a MetricsAggregator,
    params: RecurringParams,
}

impl<'a> RecurringScanner<'a> {
    pub fn new(
        importer: &'a SheetImporter,
        aggregator: &'a MetricsAggregator,
        params: RecurringParams,
    ) -> Self {
        Self {
            importer,
            aggregator,
            params,
        }
    }

    /// 扫描回看窗口
    ///
    /// # 参数
    /// - source: 工作簿数据源
    /// - cache: 单次请求内的月份缓存
    /// - available: 全部可用月份
    /// - selected: 用户所选月份
    ///
    /// # 返回
    /// - 按出现次数降序，并列按母 SKU 升序；窗口为空或无满足条件的 SKU → 空
    pub fn scan(
        &self,
        source: &mut dyn WorkbookSource,
        cache: &mut PeriodCache,
        available: &[String],
        selected: &[String],
    ) -> Vec<RecurringSku> {
        let Some(reference) = calendar::latest(selected) else {
            return Vec::new();
        };

        let window = calendar::lookback(available, &reference, self.params.window);
        debug!(reference = %reference, window = ?window, "重复问题 SKU 回看窗口");

        let mut appearances: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for period in &window {
            let records = match cache.get_or_load(period, source, self.importer) {
                Ok(records) => records,
                Err(e) => {
                    warn!(period = %period, error = %e, "回看月份加载失败，已跳过");
                    continue;
                }
            };

            for sku in self.top_by_scrap(records) {
                appearances.entry(sku).or_default().push(period.clone());
            }
        }

        let mut result: Vec<RecurringSku> = appearances
            .into_iter()
            .filter(|(_, months)| months.len() >= self.params.min_appearances)
            .map(|(parent_sku, months)| RecurringSku {
                parent_sku,
                months_in_top: months.len(),
                months,
            })
            .collect();
        result.sort_by(|a, b| b.months_in_top.cmp(&a.months_in_top));

        info!(
            window = window.len(),
            recurring = result.len(),
            "重复问题 SKU 扫描完成"
        );
        result
    }

    /// 单月不合格数 Top-N 的母 SKU（只计不合格数 > 0）
    fn top_by_scrap(&self, records: &[crate::domain::InspectionRecord]) -> Vec<String> {
        let mut rows: Vec<_> = self
            .aggregator
            .rollup_by_parent_sku(records)
            .into_iter()
            .filter(|row| row.scrap > 0)
            .collect();
        rows.sort_by(|a, b| b.scrap.cmp(&a.scrap));
        rows.into_iter()
            .take(self.params.top_n)
            .map(|row| row.parent_sku)
            .collect()
    }
}
