// ==========================================
// QC 检验分析引擎 - 数据清洗器实现
// ==========================================
// 职责: TRIM / 缺失值哨兵 / 数值强制转换 / 日期解析 / 标记标准化
// 规则:
// - 计数字段: 非数字或缺失 → 0，小数截断，负数 → 0
// - 百分比字段: 非数字 → 缺失（不是 0）
// - 日期字段: 无法解析 → 缺失
// - 文本字段: TRIM，字面量 "nan" → 空串
// - 标记字段: TRIM + UPPER，"X" → 已标记，其余 → 未标记
// ==========================================

use crate::domain::CellValue;
use chrono::{NaiveDate, NaiveDateTime};

/// 缺失值哨兵（上游表格导出时 NaN 被写成的字面量）
pub const MISSING_SENTINEL: &str = "nan";

/// 已标记的标记值
pub const FLAG_MARK: &str = "X";

/// 支持的日期文本格式
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"];

/// 支持的日期时间文本格式
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// 计数字段清洗结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanedCount {
    pub value: u64,
    /// 原值为负数（已置 0）
    pub was_negative: bool,
}

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段
    pub fn clean_text(&self, cell: &CellValue) -> String {
        let text = cell.as_text();
        let trimmed = text.trim();
        if trimmed == MISSING_SENTINEL {
            String::new()
        } else {
            trimmed.to_string()
        }
    }

    /// 解析数值（无法解析 → None）
    pub fn parse_number(&self, cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Empty | CellValue::DateTime(_) => None,
        }
    }

    /// 清洗计数字段
    pub fn clean_count(&self, cell: &CellValue) -> CleanedCount {
        match self.parse_number(cell) {
            None => CleanedCount {
                value: 0,
                was_negative: false,
            },
            Some(n) => {
                let truncated = n.trunc();
                if truncated < 0.0 {
                    CleanedCount {
                        value: 0,
                        was_negative: true,
                    }
                } else {
                    CleanedCount {
                        value: truncated as u64,
                        was_negative: false,
                    }
                }
            }
        }
    }

    /// 清洗百分比字段（缺失与 0% 区分）
    pub fn parse_percent(&self, cell: &CellValue) -> Option<f64> {
        self.parse_number(cell)
    }

    /// 解析日期
    pub fn parse_date(&self, cell: &CellValue) -> Option<NaiveDate> {
        match cell {
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Text(s) => {
                let value = s.trim();
                if value.is_empty() {
                    return None;
                }
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                    .or_else(|| {
                        DATETIME_FORMATS
                            .iter()
                            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                            .map(|dt| dt.date())
                    })
            }
            _ => None,
        }
    }

    /// 清洗标记字段
    pub fn clean_flag(&self, cell: &CellValue) -> bool {
        cell.as_text().trim().to_uppercase() == FLAG_MARK
    }
}
