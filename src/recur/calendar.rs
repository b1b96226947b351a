//! Calendar primitives for the recurrence engine
//!
//! Everything here works on whole days. Month and year arithmetic keeps the
//! day-of-month and rolls any excess into the following month, so
//! Jan 31 + 1 month lands on Mar 2 (leap year) or Mar 3, and Feb 29 + 1 year
//! lands on Mar 1.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

/// Fixed storage and wire format for dates (YYYYMMDD, no separators)
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Years outside 0000-9999 have no 8-digit representation
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// Drop the time-of-day component
pub fn truncate_to_day(dt: NaiveDateTime) -> NaiveDate {
    dt.date()
}

/// True iff `a` falls on a later calendar day than `b`
pub fn is_strictly_after(a: NaiveDate, b: NaiveDate) -> bool {
    a > b
}

/// True if `date` can be written in the 8-digit format
pub fn is_representable(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let delta = Days::new(days.unsigned_abs());
    let result = if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    };
    result.filter(|&d| is_representable(d))
}

pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year().checked_mul(12)?
        .checked_add(date.month0() as i32)?
        .checked_add(months)?;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;

    // Day 1 always exists; walking forward from it rolls overflow into the next month
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first
        .checked_add_days(Days::new(u64::from(date.day() - 1)))
        .filter(|&d| is_representable(d))
}

pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    add_months(date, years.checked_mul(12)?)
}

/// Number of days in `month` of `year`
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) { 29 } else { 28 }
        }
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Parse a date in the fixed 8-digit format
///
/// chrono alone would accept signed or shorter years, so the shape is
/// checked first.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
