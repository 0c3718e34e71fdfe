// ==========================================
// QC 检验分析引擎 - 分析编排器
// ==========================================
// 用途: 对一次月份选择执行完整分析流程
// 流程: 加载所选月份 → 汇总/排名/趋势 → 交付/集中度/重复问题 → 洞察
// 空结果: 未选择月份或所选月份无记录 → AnalysisOutcome::Empty（不是错误）
// ==========================================

use crate::config::{AnalyticsConfig, AnalyticsConfigReader};
use crate::domain::{
    ConcentrationAlert, DqNote, EmptyReason, InspectionRecord, InspectorPerformanceRow,
    MonthlyTrendExtendedRow, MonthlyTrendRow, OnTimeMetrics, ProblemSkuRollups, RecurringSku,
    RedFlagOrderRow, RedFlagSkuRow, RepairSkuRow, SewingIssueRow, SummaryMetrics,
};
use crate::engine::calendar;
use crate::engine::concentration::concentration_alerts;
use crate::engine::delivery::on_time_metrics;
use crate::engine::insight::InsightGenerator;
use crate::engine::metrics::{average_touch_rate, MetricsAggregator};
use crate::engine::recurring::RecurringScanner;
use crate::engine::sku::SkuNormalizer;
use crate::importer::{
    FieldMapper, IngestionReport, PeriodCache, SheetFailure, SheetImporter, SheetOutcome,
    WorkbookSource,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

// ==========================================
// AnalysisReport - 分析结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    // 选择
    pub batch_id: String,
    pub selected_periods: Vec<String>,

    // 汇总
    pub summary: SummaryMetrics,

    // 排名
    pub problem_skus: ProblemSkuRollups,
    pub top_repair_skus: Vec<RepairSkuRow>,
    pub inspector_performance: Vec<InspectorPerformanceRow>,
    pub sewing_issues: Vec<SewingIssueRow>,
    pub repairs_by_parent_sku: Vec<RepairSkuRow>,

    // 趋势
    pub monthly_trends: Vec<MonthlyTrendRow>,
    pub monthly_trends_extended: Vec<MonthlyTrendExtendedRow>,
    pub average_touch_rate: f64,

    // 风险
    pub red_flags: Vec<RedFlagSkuRow>,
    pub red_flag_orders: Vec<RedFlagOrderRow>,
    pub on_time: OnTimeMetrics,
    pub concentration_alerts: Vec<ConcentrationAlert>,
    pub recurring_skus: Vec<RecurringSku>,
    pub active_inspectors: Vec<String>,

    // 洞察
    pub insights: Vec<String>,
    pub sewing_insight: String,
    pub delivery_insight: String,
    pub touch_rate_insight: String,

    // 导入诊断
    pub sheet_failures: Vec<SheetFailure>,
    pub rows_by_sheet: Vec<(String, usize)>,
    pub dq_notes: Vec<DqNote>,
}

/// 一次分析的结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Empty {
        reason: EmptyReason,
        sheet_failures: Vec<SheetFailure>,
    },
    Report(Box<AnalysisReport>),
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Report(report) => Some(report),
            AnalysisOutcome::Empty { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AnalysisOutcome::Empty { .. })
    }
}

// ==========================================
// AnalysisEngine - 分析编排器
// ==========================================
pub struct AnalysisEngine {
    config: AnalyticsConfig,
    importer: SheetImporter,
    aggregator: MetricsAggregator,
    insights: InsightGenerator,
}

impl AnalysisEngine {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 分析参数快照
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            importer: SheetImporter::new(Box::new(FieldMapper::new(config.column_schema.clone()))),
            aggregator: MetricsAggregator::new(SkuNormalizer::new(config.sku_catalog.clone())),
            insights: InsightGenerator::new(config.insights.clone(), config.locale.clone()),
            config,
        }
    }

    /// 从配置读取器创建
    pub fn from_reader<R: AnalyticsConfigReader + ?Sized>(reader: &R) -> Self {
        Self::new(reader.load_analytics_config())
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn importer(&self) -> &SheetImporter {
        &self.importer
    }

    pub fn aggregator(&self) -> &MetricsAggregator {
        &self.aggregator
    }

    /// 执行分析
    ///
    /// # 参数
    /// - source: 工作簿数据源
    /// - available: 工作簿中全部月度工作表
    /// - selected: 用户所选月份
    ///
    /// # 返回
    /// - AnalysisOutcome::Empty: 未选择月份 / 所选月份没有记录
    /// - AnalysisOutcome::Report: 完整分析结果
    #[instrument(skip(self, source, available), fields(selected = ?selected))]
    pub fn analyze(
        &self,
        source: &mut dyn WorkbookSource,
        available: &[String],
        selected: &[String],
    ) -> AnalysisOutcome {
        if selected.is_empty() {
            info!("未选择月份");
            return AnalysisOutcome::Empty {
                reason: EmptyReason::NoPeriodsSelected,
                sheet_failures: Vec::new(),
            };
        }

        // === 步骤 1: 加载所选月份 ===
        let ordered = calendar::sort_chronological(selected);
        let ingestion = self.importer.load_all(source, &ordered);
        if ingestion.is_empty() {
            info!(failed = ingestion.failures().len(), "所选月份没有记录");
            return AnalysisOutcome::Empty {
                reason: EmptyReason::NoRecords,
                sheet_failures: ingestion.failures(),
            };
        }

        // 已加载的月份放入缓存，重复问题扫描不再重复读取
        let mut cache = PeriodCache::new();
        prefill_cache(&mut cache, &ingestion);

        // === 步骤 2: 重复问题 SKU（需要回看未选择的月份）===
        debug!("步骤 2: 重复问题 SKU 扫描");
        let scanner = RecurringScanner::new(
            &self.importer,
            &self.aggregator,
            self.config.recurring.clone(),
        );
        let recurring_skus = scanner.scan(source, &mut cache, available, &ordered);

        // === 步骤 3: 其余指标 ===
        let report = self.build_report(&ingestion, ordered, recurring_skus);
        info!(
            batch_id = %report.batch_id,
            records = ingestion.records.len(),
            insights = report.insights.len(),
            "分析完成"
        );
        AnalysisOutcome::Report(Box::new(report))
    }

    /// 汇总全部指标
    fn build_report(
        &self,
        ingestion: &IngestionReport,
        selected_periods: Vec<String>,
        recurring_skus: Vec<RecurringSku>,
    ) -> AnalysisReport {
        let records: &[InspectionRecord] = &ingestion.records;
        let cfg = &self.config;
        let agg = &self.aggregator;

        debug!("步骤 3: 汇总与排名");
        let summary = agg.summary(records);
        let problem_skus = agg.problem_skus(records, cfg.top_n, cfg.min_volume);
        let inspector_performance = agg.inspector_performance(records);

        debug!("步骤 4: 趋势");
        let monthly_trends_extended = agg.monthly_trends_extended(records);
        let monthly_trends = monthly_trends_extended.iter().map(|r| r.base.clone()).collect();
        let touch_rate = average_touch_rate(&monthly_trends_extended);

        debug!("步骤 5: 交付与集中度");
        let on_time = on_time_metrics(records, cfg.on_time_target_pct);
        let alerts = concentration_alerts(records, agg.normalizer(), &cfg.concentration);

        debug!("步骤 6: 洞察");
        let insights = self
            .insights
            .generate(&summary, &problem_skus, &inspector_performance);

        AnalysisReport {
            batch_id: ingestion.batch_id.clone(),
            active_inspectors: agg.active_inspectors(records, &selected_periods),
            selected_periods,
            top_repair_skus: agg.top_repair_skus(records, cfg.top_n, cfg.min_volume),
            sewing_issues: agg.sewing_issues(records, cfg.detail_top_n),
            repairs_by_parent_sku: agg.repairs_by_parent_sku(records, cfg.detail_top_n),
            red_flags: agg.red_flag_analysis(records),
            red_flag_orders: agg.red_flag_orders(records),
            sewing_insight: self.insights.sewing_detection_insight(&summary),
            delivery_insight: self.insights.delivery_insight(&on_time),
            touch_rate_insight: self.insights.touch_rate_insight(touch_rate),
            summary,
            problem_skus,
            inspector_performance,
            monthly_trends,
            monthly_trends_extended,
            average_touch_rate: touch_rate,
            on_time,
            concentration_alerts: alerts,
            recurring_skus,
            insights,
            sheet_failures: ingestion.failures(),
            rows_by_sheet: ingestion.rows_by_sheet(),
            dq_notes: ingestion.dq_notes.clone(),
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

fn prefill_cache(cache: &mut PeriodCache, ingestion: &IngestionReport) {
    for outcome in &ingestion.outcomes {
        if let SheetOutcome::Loaded { sheet, .. } = outcome {
            let records: Vec<InspectionRecord> = ingestion
                .records
                .iter()
                .filter(|r| &r.period == sheet)
                .cloned()
                .collect();
            cache.insert(sheet.clone(), records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, RawSheet};
    use crate::importer::MemoryWorkbook;

    fn sheet(name: &str, rows: &[(&str, f64, f64, f64, f64)]) -> RawSheet {
        let mut data = vec![vec![CellValue::from("header"); 18]];
        for (i, (sku, qty, final_qty, scrap, repairs)) in rows.iter().enumerate() {
            let mut row = vec![CellValue::Empty; 18];
            row[0] = CellValue::from(format!("{}-{}", name, i));
            row[4] = CellValue::from(*sku);
            row[5] = CellValue::Number(*qty);
            row[6] = CellValue::Number(*repairs);
            row[8] = CellValue::Number(*scrap);
            row[10] = CellValue::Number(*final_qty);
            row[11] = CellValue::from("ANA");
            data.push(row);
        }
        RawSheet::new(name, data)
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_periods_selected() {
        let engine = AnalysisEngine::default();
        let mut workbook = MemoryWorkbook::default();
        let outcome = engine.analyze(&mut workbook, &[], &[]);
        assert!(matches!(
            outcome,
            AnalysisOutcome::Empty {
                reason: EmptyReason::NoPeriodsSelected,
                ..
            }
        ));
    }

    #[test]
    fn test_no_records_carries_failures() {
        let engine = AnalysisEngine::default();
        let mut workbook = MemoryWorkbook::new(vec![sheet("JAN26", &[])]);
        let outcome = engine.analyze(
            &mut workbook,
            &tokens(&["JAN26"]),
            &tokens(&["JAN26", "FEB26"]),
        );

        match outcome {
            AnalysisOutcome::Empty {
                reason,
                sheet_failures,
            } => {
                assert_eq!(reason, EmptyReason::NoRecords);
                assert_eq!(sheet_failures.len(), 1);
                assert_eq!(sheet_failures[0].sheet, "FEB26");
            }
            AnalysisOutcome::Report(_) => panic!("expected empty outcome"),
        }
    }

    #[test]
    fn test_report_selected_periods_chronological() {
        let engine = AnalysisEngine::default();
        let mut workbook = MemoryWorkbook::new(vec![
            sheet("FEB26", &[("AC-HK", 50.0, 48.0, 2.0, 1.0)]),
            sheet("JAN26", &[("AC-HK-BK", 100.0, 95.0, 5.0, 3.0)]),
        ]);
        let available = tokens(&["FEB26", "JAN26"]);
        let outcome = engine.analyze(&mut workbook, &available, &available);

        let report = outcome.report().unwrap();
        assert_eq!(report.selected_periods, tokens(&["JAN26", "FEB26"]));
        assert_eq!(report.summary.total_inspected, 150);
        assert_eq!(report.monthly_trends.len(), 2);
        assert_eq!(report.active_inspectors, tokens(&["ANA"]));
        assert!(!report.insights.is_empty());
    }
}
