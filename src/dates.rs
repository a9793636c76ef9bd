//! Relative-date resolution and calendar helpers.
//!
//! The central operation is [`resolve_month_day`]: an abbreviated `M/D`
//! string is mapped to its nearest occurrence that is not in the past —
//! always rounding forward, never backward.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Error, Result};

/// Resolve an abbreviated `M/D` / `MM/DD` string against `today`.
///
/// The candidate date is built in `today`'s year; if it falls strictly
/// before `today` it rolls to the same month/day in the next year, so the
/// result is always today-or-future. Comparison ignores time of day by
/// construction.
///
/// Month must be in `[1, 12]` and day in `[1, 31]`. Day-within-month is
/// deliberately not checked against the month's length; a day past the end
/// of the month spills into the following month (`2/30` resolves through
/// early March), which reproduces the behavior the stored data was written
/// under. Tightening this would reject previously accepted inputs.
pub fn resolve_month_day(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    let (month, day) = split_month_day(raw)?;
    let candidate = build_date(today.year(), month, day, raw)?;
    if candidate < today {
        build_date(today.year() + 1, month, day, raw)
    } else {
        Ok(candidate)
    }
}

/// Check whether a due date has slipped: strictly before `today`.
///
/// A task due exactly today is not overdue.
pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}

/// Format a date for display, `YYYY/MM/DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

fn split_month_day(raw: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidDateFormat(raw.to_string());
    let (month_str, day_str) = raw.trim().split_once('/').ok_or_else(invalid)?;
    let month: u32 = month_str.parse().map_err(|_| invalid())?;
    let day: u32 = day_str.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    Ok((month, day))
}

/// Build year/month/day with overflow days spilling into the next month.
fn build_date(year: i32, month: u32, day: u32, raw: &str) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day - 1))))
        .ok_or_else(|| Error::InvalidDateFormat(raw.to_string()))
}
