// ==========================================
// QC 检验分析引擎 - 指标结果对象
// ==========================================
// 职责: 聚合器输出的只读快照（每次计算重新生成，不持久化）
// ==========================================

use serde::{Deserialize, Serialize};

/// 汇总指标
///
/// total_fails 恒等于 total_scrap：QC / 缝纫不合格只说明在哪个环节发现，
/// 不是额外的不合格数。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_inspected: u64,
    pub total_passed: u64,
    pub total_repairs: u64,
    pub total_scrap: u64,
    pub total_qc_fails: u64,
    pub total_sewing_fails: u64,
    pub total_fails: u64,
    pub total_orders: usize,
    pub total_red_flags: usize,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub repair_rate: f64,
    pub scrap_rate: f64,
    pub sewing_detection_rate: f64,
}

/// 母 SKU 汇总行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkuRollupRow {
    pub parent_sku: String,
    pub quantity: u64,
    pub final_qty: u64,
    pub repairs: u64,
    pub scrap: u64,
    pub qc_fail: u64,
    pub sewing_fail: u64,
    pub total_fails: u64,
    /// 不合格率（%，两位小数）
    pub fail_rate: f64,
    /// 返修率（%，两位小数）
    pub repair_rate: f64,
}

/// 问题 SKU 两种排名
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProblemSkuRollups {
    /// 按不合格数排名（无产量门槛）
    pub by_fail_count: Vec<SkuRollupRow>,
    /// 按不合格率排名（产量 >= 门槛）
    pub by_fail_rate: Vec<SkuRollupRow>,
}

/// 返修 SKU 行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepairSkuRow {
    pub parent_sku: String,
    pub quantity: u64,
    pub repairs: u64,
    pub repair_rate: f64,
}

/// 缝纫环节问题 SKU 行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SewingIssueRow {
    pub parent_sku: String,
    pub quantity: u64,
    pub sewing_fail: u64,
    pub qc_fail: u64,
    pub sewing_fail_rate: f64,
}

/// 检验员绩效行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InspectorPerformanceRow {
    pub inspector: String,
    pub quantity: u64,
    pub final_qty: u64,
    pub repairs: u64,
    pub scrap: u64,
    pub qc_fail: u64,
    pub sewing_fail: u64,
    pub orders: usize,
    pub red_flags: usize,
    pub pass_rate: f64,
    pub total_fails: u64,
}

/// 月度趋势行
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyTrendRow {
    pub period: String,
    pub quantity: u64,
    pub final_qty: u64,
    pub repairs: u64,
    pub scrap: u64,
    pub qc_fail: u64,
    pub sewing_fail: u64,
    pub orders: usize,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub repair_rate: f64,
    pub total_fails: u64,
}

/// 月度趋势行（扩展）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyTrendExtendedRow {
    #[serde(flatten)]
    pub base: MonthlyTrendRow,
    /// NCR 已完成数
    pub ncr_count: usize,
    pub red_flags: usize,
    /// 返工总数（= repairs）
    pub total_reworks: u64,
    /// 触碰率 = (repairs + scrap) / quantity × 100
    pub touch_rate: f64,
}

/// 红旗（客诉）按母 SKU 汇总
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RedFlagSkuRow {
    pub parent_sku: String,
    pub orders: usize,
    pub red_flag_count: usize,
}

/// 红旗订单明细（NCR 复核）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RedFlagOrderRow {
    pub order_number: String,
    pub sku: String,
    pub inspector: String,
    pub quantity: u64,
    pub ncr_complete: bool,
    pub period: String,
}

/// 准时交付指标
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OnTimeMetrics {
    /// 有交期的记录数（分母）
    pub eligible_orders: usize,
    pub on_time_orders: usize,
    pub total_late_orders: usize,
    pub total_days_late: i64,
    /// 仅对延迟记录求平均
    pub avg_days_late: f64,
    /// 准时率（%，一位小数）
    pub on_time_rate: f64,
    /// 缺少交期（不计入分母）
    pub orders_missing_due_date: usize,
    /// 有交期但缺少完成日期（计入分母，视为准时）
    pub orders_missing_finished_date: usize,
    pub target_rate: f64,
    pub meets_target: bool,
}

/// 检验员-母 SKU 集中度告警
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcentrationAlert {
    pub inspector: String,
    pub parent_sku: String,
    pub inspector_sku_orders: usize,
    pub total_sku_orders: usize,
    /// 集中度（%，一位小数）
    pub concentration_pct: f64,
}

/// 反复出现的问题 SKU
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecurringSku {
    pub parent_sku: String,
    /// 进入各月 Top-N 的次数
    pub months_in_top: usize,
    /// 进入 Top-N 的月份（时间顺序）
    pub months: Vec<String>,
}
