// ==========================================
// QC 检验分析引擎 - 月份日历
// ==========================================
// 职责: 月份标记 (MMMYY) 解析 / 时间排序 / 回看窗口 / 季度与 YTD 预设
// 规则:
// - 前 3 位（不区分大小写）查月份表，未知缩写 → 1 月
// - 后 2 位为数字，+2000 得年份；非数字 → CalendarError::Parse
// - 排序只按 (年, 月)，不按字典序或插入顺序
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// 月份缩写表
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// 未识别缩写时使用的月份
const UNKNOWN_MONTH: u32 = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("月份标记解析失败 ({token}): {reason}")]
    Parse { token: String, reason: String },
}

pub type CalendarResult<T> = Result<T, CalendarError>;

// ==========================================
// Period - 月份
// ==========================================
// 字段顺序决定 Ord: 先年后月，原始标记只用于区分同月不同写法
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
    pub token: String,
}

impl Period {
    pub fn parse(token: &str) -> CalendarResult<Self> {
        let (year, month) = parse(token)?;
        Ok(Self {
            year,
            month,
            token: token.to_string(),
        })
    }

    /// 所属季度 (1..=4)
    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

/// 解析月份标记
///
/// # 示例
/// - "JAN26" → (2026, 1)
/// - "DEC25" → (2025, 12)
pub fn parse(token: &str) -> CalendarResult<(i32, u32)> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 5 {
        return Err(CalendarError::Parse {
            token: token.to_string(),
            reason: "长度不足 5 位".to_string(),
        });
    }

    let suffix: String = chars[chars.len() - 2..].iter().collect();
    let year_offset: i32 = suffix.parse().map_err(|_| CalendarError::Parse {
        token: token.to_string(),
        reason: format!("年份后缀不是数字: {}", suffix),
    })?;

    let abbreviation: String = chars[..3].iter().collect::<String>().to_uppercase();
    let month = match MONTH_ABBREVIATIONS.iter().position(|m| *m == abbreviation) {
        Some(idx) => idx as u32 + 1,
        None => {
            debug!(token = token, "未知月份缩写，按 1 月处理");
            UNKNOWN_MONTH
        }
    };

    Ok((2000 + year_offset, month))
}

/// 排序键 (年, 月)
pub fn sort_key(token: &str) -> CalendarResult<(i32, u32)> {
    parse(token)
}

/// 按时间顺序排序并去重
///
/// 无法解析的标记排在最前（按字典序）
pub fn sort_chronological<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let unique: BTreeSet<(i32, u32, String)> = tokens
        .iter()
        .map(|t| {
            let token = t.as_ref();
            let (year, month) = sort_key(token).unwrap_or((i32::MIN, 0));
            (year, month, token.to_string())
        })
        .collect();

    unique.into_iter().map(|(_, _, token)| token).collect()
}

/// 最近的月份
pub fn latest<S: AsRef<str>>(tokens: &[S]) -> Option<String> {
    sort_chronological(tokens).pop()
}

/// 回看窗口
///
/// # 参数
/// - available: 可用月份
/// - reference: 参考月份（窗口终点，包含在内）
/// - window: 窗口长度
///
/// # 返回
/// - 按时间排序、以 reference 结尾的至多 window 个月份
/// - reference 不在 available 中 → 空
/// - 之前的月份不足时只返回已有部分，不补齐
pub fn lookback<S: AsRef<str>>(available: &[S], reference: &str, window: usize) -> Vec<String> {
    if window == 0 {
        return Vec::new();
    }

    let ordered = sort_chronological(available);
    let Some(end) = ordered.iter().position(|t| t == reference) else {
        return Vec::new();
    };

    let start = (end + 1).saturating_sub(window);
    ordered[start..=end].to_vec()
}

// ==========================================
// 季度 / YTD 预设
// ==========================================

/// 月份预设（如 "Q1 2026" / "YTD 2026"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPreset {
    pub label: String,
    pub periods: Vec<String>,
}

/// 生成预设
///
/// 年份从近到远；同一年内 YTD 在前，其后 Q1..Q4；没有月份的预设不输出。
/// 当前年份的 YTD 只包含不晚于 now 所在月的月份，其他年份包含全部月份。
pub fn presets<S: AsRef<str>>(available: &[S], now: NaiveDate) -> Vec<MonthPreset> {
    let periods: Vec<Period> = sort_chronological(available)
        .iter()
        .filter_map(|t| Period::parse(t).ok())
        .collect();

    let years: BTreeSet<i32> = periods.iter().map(|p| p.year).collect();

    let mut result = Vec::new();
    for year in years.into_iter().rev() {
        let in_year: Vec<&Period> = periods.iter().filter(|p| p.year == year).collect();

        let ytd: Vec<String> = in_year
            .iter()
            .filter(|p| year != now.year() || p.month <= now.month())
            .map(|p| p.token.clone())
            .collect();
        if !ytd.is_empty() {
            result.push(MonthPreset {
                label: format!("YTD {}", year),
                periods: ytd,
            });
        }

        for quarter in 1..=4 {
            let tokens: Vec<String> = in_year
                .iter()
                .filter(|p| p.quarter() == quarter)
                .map(|p| p.token.clone())
                .collect();
            if !tokens.is_empty() {
                result.push(MonthPreset {
                    label: format!("Q{} {}", quarter, year),
                    periods: tokens,
                });
            }
        }
    }

    result
}
