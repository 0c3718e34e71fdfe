// ==========================================
// QC 检验分析引擎 - 看板 API
// ==========================================
// 职责: 月份选择解析 + 按角色组织分析结果
// 架构: API 层 → AnalysisEngine → 导入层 / 指标聚合器
// 说明: 角色只决定展示哪些板块，不影响任何计算
// ==========================================

use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalyticsConfig;
use crate::domain::{EmptyReason, InspectorPerformanceRow, RoleView};
use crate::engine::calendar::{self, MonthPreset};
use crate::engine::concentration::is_excluded_inspector;
use crate::engine::{AnalysisEngine, AnalysisOutcome, AnalysisReport};
use crate::i18n::t_locale_with_args;
use crate::importer::{monthly_sheets, open_workbook, SheetFailure, WorkbookSource};

// ==========================================
// 月份选择
// ==========================================

/// 调用方的月份选择方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
    /// 最近一个月（默认）
    Latest,
    /// 预设标签，如 "Q1 2026" / "YTD 2026"
    Preset(String),
    /// 手动指定的月份标记
    Manual(Vec<String>),
}

impl Default for MonthSelection {
    fn default() -> Self {
        MonthSelection::Latest
    }
}

// ==========================================
// 看板板块
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    SummaryMetrics,
    OnTimeDelivery,
    KeyInsights,
    ExecutiveSummary,
    ProblemSkusByCount,
    ProblemSkusByRate,
    TopRepairSkus,
    InspectorSummary,
    MonthOverMonthTrends,
    QualityDistribution,
    RedFlags,
    SkusRequiringAttention,
    ConcentrationAlerts,
    InspectorComparison,
    ExcludedInspectors,
    RedFlagOrders,
    DefectDetection,
    SewingQuality,
    RecurringSkus,
    SewingFails,
    RepairsByParentSku,
    MonthlyTrends,
}

impl DashboardSection {
    /// 板块标题的翻译键
    pub fn title_key(&self) -> &'static str {
        match self {
            DashboardSection::SummaryMetrics => "section.summary",
            DashboardSection::OnTimeDelivery => "section.on_time",
            DashboardSection::KeyInsights => "section.key_insights",
            DashboardSection::ExecutiveSummary => "section.executive_summary",
            DashboardSection::ProblemSkusByCount => "section.problem_by_count",
            DashboardSection::ProblemSkusByRate => "section.problem_by_rate",
            DashboardSection::TopRepairSkus | DashboardSection::RepairsByParentSku => {
                "section.top_repairs"
            }
            DashboardSection::InspectorSummary => "section.inspector_summary",
            DashboardSection::MonthOverMonthTrends => "section.month_over_month",
            DashboardSection::QualityDistribution => "section.quality_distribution",
            DashboardSection::RedFlags => "section.red_flags",
            DashboardSection::SkusRequiringAttention => "section.attention_skus",
            DashboardSection::ConcentrationAlerts => "section.concentration",
            DashboardSection::InspectorComparison => "section.inspector_comparison",
            DashboardSection::ExcludedInspectors => "section.excluded_inspectors",
            DashboardSection::RedFlagOrders => "section.red_flag_orders",
            DashboardSection::DefectDetection => "section.defect_detection",
            DashboardSection::SewingQuality => "section.sewing_quality",
            DashboardSection::RecurringSkus => "section.recurring",
            DashboardSection::SewingFails => "section.sewing_fails",
            DashboardSection::MonthlyTrends => "section.monthly_trends",
        }
    }
}

/// 角色视图展示的板块（按展示顺序）
///
/// 部分板块只在有数据时出现：集中度告警、排除角色检验量、
/// 环比趋势（扩展趋势多于一个月）、月度趋势（选择多于一个月）。
pub fn sections_for(
    role: RoleView,
    report: &AnalysisReport,
    excluded_patterns: &[String],
) -> Vec<DashboardSection> {
    use DashboardSection::*;

    let mut sections = vec![SummaryMetrics];
    match role {
        RoleView::ProductionManager => sections.extend([
            OnTimeDelivery,
            KeyInsights,
            ProblemSkusByCount,
            ProblemSkusByRate,
            TopRepairSkus,
            InspectorSummary,
        ]),
        RoleView::OperationsDirector => {
            sections.push(ExecutiveSummary);
            if report.monthly_trends_extended.len() > 1 {
                sections.push(MonthOverMonthTrends);
            }
            sections.extend([QualityDistribution, RedFlags, SkusRequiringAttention]);
            if !report.concentration_alerts.is_empty() {
                sections.push(ConcentrationAlerts);
            }
        }
        RoleView::QcManager => {
            sections.push(KeyInsights);
            if !report.concentration_alerts.is_empty() {
                sections.push(ConcentrationAlerts);
            }
            sections.push(InspectorComparison);
            if report
                .inspector_performance
                .iter()
                .any(|row| is_excluded_inspector(&row.inspector, excluded_patterns))
            {
                sections.push(ExcludedInspectors);
            }
            sections.extend([RedFlagOrders, DefectDetection]);
        }
        RoleView::SewingManager => sections.extend([
            SewingQuality,
            KeyInsights,
            RecurringSkus,
            SewingFails,
            RepairsByParentSku,
        ]),
    }

    if report.selected_periods.len() > 1 {
        sections.push(MonthlyTrends);
    }
    sections
}

// ==========================================
// 检验员对比（质检经理视图）
// ==========================================

/// 检验员对比表
///
/// comparison 不含排除角色与已离开的检验员（不在最近所选月份出现）
#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectorComparison {
    pub comparison: Vec<InspectorPerformanceRow>,
    pub excluded: Vec<InspectorPerformanceRow>,
    pub former: Vec<String>,
}

impl InspectorComparison {
    pub fn build(
        rows: &[InspectorPerformanceRow],
        active: &[String],
        excluded_patterns: &[String],
    ) -> Self {
        let mut result = InspectorComparison::default();
        for row in rows {
            if is_excluded_inspector(&row.inspector, excluded_patterns) {
                result.excluded.push(row.clone());
            } else if active.is_empty() || active.contains(&row.inspector) {
                result.comparison.push(row.clone());
            } else {
                result.former.push(row.inspector.clone());
            }
        }
        result
    }
}

// ==========================================
// 响应
// ==========================================

/// 角色视图
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub role: RoleView,
    pub title: String,
    pub sections: Vec<DashboardSection>,
    /// 本视图展示的洞察（含角色专属的附加行）
    pub key_insights: Vec<String>,
    pub inspector_comparison: Option<InspectorComparison>,
    /// 重复问题扫描的回看月数
    pub recurring_window: usize,
    pub report: AnalysisReport,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardResponse {
    Empty {
        role: RoleView,
        reason: EmptyReason,
        message: String,
        sheet_failures: Vec<SheetFailure>,
    },
    Ready(Box<DashboardView>),
}

impl DashboardResponse {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            DashboardResponse::Ready(view) => Some(view),
            DashboardResponse::Empty { .. } => None,
        }
    }
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    source: Box<dyn WorkbookSource>,
    engine: AnalysisEngine,
}

impl DashboardApi {
    /// 打开工作簿
    ///
    /// # 参数
    /// - path: Excel 工作簿 / CSV 文件 / CSV 目录
    /// - config: 分析参数
    ///
    /// # 返回
    /// - Err(ApiError): 仅当工作簿本身无法打开
    pub fn open<P: AsRef<Path>>(path: P, config: AnalyticsConfig) -> ApiResult<Self> {
        let source = open_workbook(path)?;
        Ok(Self::from_source(source, config))
    }

    /// 使用已打开的数据源
    pub fn from_source(source: Box<dyn WorkbookSource>, config: AnalyticsConfig) -> Self {
        Self {
            source,
            engine: AnalysisEngine::new(config),
        }
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    /// 工作簿中的月度工作表（日历顺序）
    pub fn available_periods(&self) -> Vec<String> {
        calendar::sort_chronological(&monthly_sheets(self.source.as_ref()))
    }

    /// 季度 / YTD 预设
    pub fn presets(&self, now: NaiveDate) -> Vec<MonthPreset> {
        calendar::presets(&self.available_periods(), now)
    }

    /// 解析月份选择
    ///
    /// # 返回
    /// - Ok(periods): 日历顺序、去重；工作簿没有月度工作表时 Latest 返回空
    /// - Err(ApiError::NotFound): 预设不存在
    /// - Err(ApiError::InvalidInput): 手动月份标记无法解析，或工作簿中没有该月份
    ///   （月份按不区分大小写匹配，返回工作簿中的拼写）
    pub fn resolve_selection(
        &self,
        selection: &MonthSelection,
        now: NaiveDate,
    ) -> ApiResult<Vec<String>> {
        match selection {
            MonthSelection::Latest => Ok(calendar::latest(&self.available_periods())
                .into_iter()
                .collect()),
            MonthSelection::Preset(label) => self
                .presets(now)
                .into_iter()
                .find(|p| p.label.eq_ignore_ascii_case(label.trim()))
                .map(|p| p.periods)
                .ok_or_else(|| ApiError::NotFound(format!("月份预设不存在: {}", label))),
            MonthSelection::Manual(tokens) => {
                let available = self.available_periods();
                let mut resolved = Vec::new();
                for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
                    calendar::parse(token)?;
                    // 工作表名可能是 Jan26 这类大小写混写，返回工作簿中的原始拼写
                    let period = available
                        .iter()
                        .find(|p| p.eq_ignore_ascii_case(token))
                        .ok_or_else(|| {
                            ApiError::InvalidInput(format!("工作簿中没有该月份: {}", token))
                        })?;
                    resolved.push(period.clone());
                }
                Ok(calendar::sort_chronological(&resolved))
            }
        }
    }

    /// 执行分析并按角色组织结果
    ///
    /// # 参数
    /// - selection: 月份选择
    /// - role: 角色视图
    /// - now: 当前日期（用于 YTD 预设）
    #[instrument(skip(self))]
    pub fn analyze(
        &mut self,
        selection: &MonthSelection,
        role: RoleView,
        now: NaiveDate,
    ) -> ApiResult<DashboardResponse> {
        let available = self.available_periods();
        let selected = self.resolve_selection(selection, now)?;
        let locale = self.engine.config().locale.clone();

        let outcome = self
            .engine
            .analyze(self.source.as_mut(), &available, &selected);

        let report = match outcome {
            AnalysisOutcome::Empty {
                reason,
                sheet_failures,
            } => {
                let key = match reason {
                    EmptyReason::NoPeriodsSelected => "report.empty.no_periods_selected",
                    EmptyReason::NoRecords => "report.empty.no_records",
                };
                info!(reason = %reason, "看板无数据");
                return Ok(DashboardResponse::Empty {
                    role,
                    reason,
                    message: t_locale_with_args(&locale, key, &[]),
                    sheet_failures,
                });
            }
            AnalysisOutcome::Report(report) => *report,
        };

        let excluded = &self.engine.config().concentration.excluded_inspectors;
        let sections = sections_for(role, &report, excluded);
        let key_insights = key_insights_for(role, &report);
        let inspector_comparison = (role == RoleView::QcManager).then(|| {
            InspectorComparison::build(
                &report.inspector_performance,
                &report.active_inspectors,
                excluded,
            )
        });
        let title = t_locale_with_args(&locale, "report.view", &[("role", role.title())]);

        Ok(DashboardResponse::Ready(Box::new(DashboardView {
            role,
            title,
            sections,
            key_insights,
            inspector_comparison,
            recurring_window: self.engine.config().recurring.window,
            report,
        })))
    }
}

/// 角色视图的洞察列表
fn key_insights_for(role: RoleView, report: &AnalysisReport) -> Vec<String> {
    match role {
        RoleView::ProductionManager => std::iter::once(report.delivery_insight.clone())
            .chain(report.insights.iter().cloned())
            .collect(),
        RoleView::OperationsDirector => {
            let mut lines = Vec::new();
            if !report.monthly_trends_extended.is_empty() {
                lines.push(report.touch_rate_insight.clone());
            }
            lines.extend(report.insights.iter().cloned());
            lines
        }
        RoleView::QcManager => report.insights.clone(),
        RoleView::SewingManager => vec![report.sewing_insight.clone()],
    }
}
