// ==========================================
// QC 检验分析引擎 - 领域类型定义
// ==========================================
// 职责: 角色视图 / 数据质量等级 / 空结果原因 等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 角色视图 (Role View)
// ==========================================
// 只影响展示层选择哪些板块，不影响任何计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleView {
    ProductionManager,  // 生产经理
    OperationsDirector, // 运营总监
    QcManager,          // 质检经理
    SewingManager,      // 缝纫经理
}

impl RoleView {
    /// 全部角色（展示顺序）
    pub const ALL: [RoleView; 4] = [
        RoleView::ProductionManager,
        RoleView::OperationsDirector,
        RoleView::QcManager,
        RoleView::SewingManager,
    ];

    /// 显示名称
    pub fn title(&self) -> &'static str {
        match self {
            RoleView::ProductionManager => "Production Manager",
            RoleView::OperationsDirector => "Operations Director",
            RoleView::QcManager => "QC Manager",
            RoleView::SewingManager => "Sewing Manager",
        }
    }
}

impl Default for RoleView {
    fn default() -> Self {
        RoleView::ProductionManager
    }
}

impl fmt::Display for RoleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleView::ProductionManager => write!(f, "PRODUCTION_MANAGER"),
            RoleView::OperationsDirector => write!(f, "OPERATIONS_DIRECTOR"),
            RoleView::QcManager => write!(f, "QC_MANAGER"),
            RoleView::SewingManager => write!(f, "SEWING_MANAGER"),
        }
    }
}

impl FromStr for RoleView {
    type Err = String;

    /// 同时接受 `QC_MANAGER` / `qc-manager` / `QC Manager` 三种写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "PRODUCTION_MANAGER" => Ok(RoleView::ProductionManager),
            "OPERATIONS_DIRECTOR" => Ok(RoleView::OperationsDirector),
            "QC_MANAGER" => Ok(RoleView::QcManager),
            "SEWING_MANAGER" => Ok(RoleView::SewingManager),
            _ => Err(format!("未知角色视图: {}", s)),
        }
    }
}

// ==========================================
// 数据质量等级 (DQ Level)
// ==========================================
// 只做提示，不阻断导入
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Info,    // 信息
    Warning, // 警告
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Info => write!(f, "INFO"),
            DqLevel::Warning => write!(f, "WARNING"),
        }
    }
}

// ==========================================
// 空结果原因 (Empty Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmptyReason {
    NoPeriodsSelected, // 未选择任何月份
    NoRecords,         // 所选月份无有效记录
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoPeriodsSelected => write!(f, "NO_PERIODS_SELECTED"),
            EmptyReason::NoRecords => write!(f, "NO_RECORDS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_view_from_str_variants() {
        assert_eq!("qc-manager".parse::<RoleView>(), Ok(RoleView::QcManager));
        assert_eq!("QC Manager".parse::<RoleView>(), Ok(RoleView::QcManager));
        assert_eq!(
            "OPERATIONS_DIRECTOR".parse::<RoleView>(),
            Ok(RoleView::OperationsDirector)
        );
        assert!("janitor".parse::<RoleView>().is_err());
    }

    #[test]
    fn test_role_view_display_roundtrips() {
        for role in RoleView::ALL {
            assert_eq!(role.to_string().parse::<RoleView>(), Ok(role));
        }
    }
}
