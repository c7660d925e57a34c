//! Relative date tokens - `<7d`, `>2m` style compact literals / 相对日期词法
//!
//! `<` means "newer than" (created after the boundary), `>` means "older
//! than" (created before the boundary) / `<` 表示新于，`>` 表示旧于
//!
//! Parsing is pure: the token is kept symbolic and only resolved to a
//! concrete instant against the caller's `now` at evaluation time, so a
//! parsed query stays meaningful regardless of when it is evaluated
//! 解析是纯函数，只在求值时对调用方传入的 now 解析为具体时间点

use chrono::{DateTime, Days, Months, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compact token grammar: `[<>]<amount><unit>` / 紧凑词法
static RELDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([<>])(\d+)([dwmy])$").unwrap());

/// Whether the bookmark must be newer or older than the boundary / 新于还是旧于边界
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `<` - created after the resolved boundary / 创建于边界之后
    Newer,
    /// `>` - created before the resolved boundary / 创建于边界之前
    Older,
}

/// Calendar unit of a relative date / 相对日期的日历单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Year,
}

/// A parsed relative date token / 解析后的相对日期
///
/// Invariant: `amount > 0` (zero is rejected at parse time, never silently
/// treated as "now") / 不变量：amount > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDate {
    pub direction: Direction,
    pub amount: u32,
    pub unit: DateUnit,
}

/// Relative date token parse failure / 相对日期词法解析失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelativeDateError {
    /// 不符合 `[<>]<数字><单位>` 词法
    #[error("not a relative date token")]
    InvalidFormat,
    /// amount 为 0
    #[error("relative date amount must be greater than zero")]
    ZeroAmount,
    /// 数字溢出 u32
    #[error("relative date amount out of range")]
    AmountOutOfRange,
}

/// Parse a compact relative date token / 解析紧凑相对日期词法
///
/// Accepts only strings matching `^[<>]\d+[dwmy]$`; anything else is an error
/// value so the query parser can fall back to treating the token as a literal
/// word / 只接受严格匹配的词法，其余返回错误值供上层降级处理
pub fn parse_relative_token(token: &str) -> Result<RelativeDate, RelativeDateError> {
    let caps = RELDATE_RE
        .captures(token)
        .ok_or(RelativeDateError::InvalidFormat)?;

    let direction = match &caps[1] {
        "<" => Direction::Newer,
        _ => Direction::Older,
    };

    let amount: u32 = caps[2]
        .parse()
        .map_err(|_| RelativeDateError::AmountOutOfRange)?;
    if amount == 0 {
        return Err(RelativeDateError::ZeroAmount);
    }

    let unit = match &caps[3] {
        "d" => DateUnit::Day,
        "w" => DateUnit::Week,
        "m" => DateUnit::Month,
        _ => DateUnit::Year,
    };

    Ok(RelativeDate { direction, amount, unit })
}

impl RelativeDate {
    /// Resolve the boundary instant against an explicit `now` / 对显式 now 解析边界时间点
    ///
    /// Month and year subtraction clamp to the last valid day of the target
    /// month (Jan 31 minus 1 month is Feb 28/29) / 月和年减法会收缩到目标月的最后一天
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let result = match self.unit {
            DateUnit::Day => now.checked_sub_days(Days::new(u64::from(self.amount))),
            DateUnit::Week => now.checked_sub_days(Days::new(7 * u64::from(self.amount))),
            DateUnit::Month => now.checked_sub_months(Months::new(self.amount)),
            DateUnit::Year => now.checked_sub_months(Months::new(self.amount.saturating_mul(12))),
        };
        // 超出 chrono 可表示范围时收缩到最早可表示时间
        result.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
