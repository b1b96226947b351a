//! Next-date calculation for repeat rules
//!
//! Every search moves forward from the start date and returns the earliest
//! date that matches the rule and falls strictly after the reference date.

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::recur::calendar::{
    add_days, add_years, format_date, is_strictly_after, last_day_of_month, parse_date,
};
use crate::recur::error::{RecurError, RuleField};
use crate::recur::parser::{
    RecurrenceRule, LAST_DAY, MAX_INTERVAL, MIN_INTERVAL, SECOND_TO_LAST_DAY,
};

/// A weekday set always matches within one week
const WEEKLY_SCAN_DAYS: u32 = 7;
/// Any monthly rule that matches every year matches within 366 days
const MONTHLY_SCAN_DAYS: u32 = 366;
/// Feb 29 can be 8 years apart (2096 -> 2104)
const LEAP_DAY_SCAN_DAYS: u32 = 8 * 366;
/// Yearly search starts in the reference year, so two steps always suffice
const YEARLY_MAX_STEPS: u32 = 3;

/// Any year that is not a leap year
const COMMON_YEAR: i32 = 2023;

/// Compute the next due date for a task
///
/// # Arguments
/// * `now` - Reference date; the result is strictly after it
/// * `start_text` - Task date in YYYYMMDD format
/// * `rule_text` - Repeat rule, e.g. `d 7` or `m 1,-1`
///
/// # Returns
/// The next date in YYYYMMDD format
pub fn next_date(now: NaiveDate, start_text: &str, rule_text: &str) -> Result<String, RecurError> {
    let start = parse_date(start_text).ok_or_else(|| RecurError::InvalidStartDate {
        input: start_text.to_string(),
    })?;
    let rule = RecurrenceRule::parse(rule_text)?;

    let next = next_occurrence(&rule, start, now)?;
    debug!("next date for '{}' from {} after {}: {}", rule_text, start, now, next);

    Ok(format_date(next))
}

/// Earliest date matching `rule`, projected from `start`, strictly after `now`
pub fn next_occurrence(
    rule: &RecurrenceRule,
    start: NaiveDate,
    now: NaiveDate,
) -> Result<NaiveDate, RecurError> {
    match rule {
        RecurrenceRule::Daily { interval } => next_daily(start, now, *interval),
        RecurrenceRule::Yearly => next_yearly(start, now),
        RecurrenceRule::Weekly { weekdays } => {
            scan_forward(start, now, WEEKLY_SCAN_DAYS, |date| {
                weekdays.contains(&date.weekday().num_days_from_sunday())
            })
        }
        RecurrenceRule::Monthly { days, months } => {
            let limit = monthly_scan_limit(days, months.as_deref());
            scan_forward(start, now, limit, |date| {
                let month_ok = months
                    .as_ref()
                    .map_or(true, |months| months.contains(&date.month()));
                month_ok && matches_month_day(date, days)
            })
        }
    }
}

/// Normalise a task date on add or modify
///
/// A missing, empty or `today` date means today. A date in the past moves to
/// today for one-off tasks and to the next occurrence for repeating tasks.
/// A non-empty repeat rule is validated even when the date is kept.
pub fn resolve_due_date(
    today: NaiveDate,
    date_text: Option<&str>,
    repeat: &str,
) -> Result<String, RecurError> {
    let date = match date_text.map(str::trim) {
        None | Some("") | Some("today") => today,
        Some(text) => parse_date(text).ok_or_else(|| RecurError::InvalidStartDate {
            input: text.to_string(),
        })?,
    };

    let rule = if repeat.trim().is_empty() {
        None
    } else {
        Some(RecurrenceRule::parse(repeat)?)
    };

    let resolved = if is_strictly_after(today, date) {
        match rule {
            Some(rule) => next_occurrence(&rule, date, today)?,
            None => today,
        }
    } else {
        date
    };

    Ok(format_date(resolved))
}

fn next_daily(start: NaiveDate, now: NaiveDate, interval: u32) -> Result<NaiveDate, RecurError> {
    if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&interval) {
        return Err(RecurError::OutOfRange {
            field: RuleField::Interval,
            value: interval.to_string(),
            min: i64::from(MIN_INTERVAL),
            max: i64::from(MAX_INTERVAL),
        });
    }

    let step = i64::from(interval);
    let elapsed = now.signed_duration_since(start).num_days();

    // Smallest k >= 1 with start + k*step > now
    let steps = if elapsed < 0 { 1 } else { elapsed / step + 1 };
    let offset = steps.checked_mul(step).ok_or(RecurError::DateOverflow)?;
    let next = add_days(start, offset).ok_or(RecurError::DateOverflow)?;

    debug_assert!(is_strictly_after(next, now));
    Ok(next)
}

fn next_yearly(start: NaiveDate, now: NaiveDate) -> Result<NaiveDate, RecurError> {
    // Years before the reference year can never be after it
    let mut years = (now.year() - start.year()).max(1);

    for _ in 0..YEARLY_MAX_STEPS {
        let candidate = add_years(start, years).ok_or(RecurError::DateOverflow)?;
        if is_strictly_after(candidate, now) {
            return Ok(candidate);
        }
        years += 1;
    }

    Err(RecurError::NoOccurrence)
}

/// Day-by-day scan beginning the day after the later of `start` and `now`
fn scan_forward<F>(
    start: NaiveDate,
    now: NaiveDate,
    max_days: u32,
    matches: F,
) -> Result<NaiveDate, RecurError>
where
    F: Fn(NaiveDate) -> bool,
{
    let mut candidate = start.max(now);

    for _ in 0..max_days {
        candidate = add_days(candidate, 1).ok_or(RecurError::DateOverflow)?;
        if is_strictly_after(candidate, now) && matches(candidate) {
            return Ok(candidate);
        }
    }

    Err(RecurError::NoOccurrence)
}

fn matches_month_day(date: NaiveDate, days: &[i32]) -> bool {
    let last = last_day_of_month(date.year(), date.month());
    let day = date.day();

    days.iter().any(|&code| match code {
        LAST_DAY => day == last,
        SECOND_TO_LAST_DAY => day == last - 1,
        _ => day as i32 == code,
    })
}

/// 366 days unless the rule can only ever land on Feb 29
fn monthly_scan_limit(days: &[i32], months: Option<&[u32]>) -> u32 {
    let Some(months) = months else {
        return MONTHLY_SCAN_DAYS;
    };

    let matches_every_year = days.iter().any(|&day| {
        day < 0
            || months
                .iter()
                .any(|&month| day as u32 <= last_day_of_month(COMMON_YEAR, month))
    });

    if matches_every_year {
        MONTHLY_SCAN_DAYS
    } else {
        LEAP_DAY_SCAN_DAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recur::error::RecurErrorKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn next(now: NaiveDate, start: &str, rule: &str) -> String {
        next_date(now, start, rule).unwrap()
    }

    #[test]
    fn test_daily_skips_dates_not_after_now() {
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "d 7"), "20240115");
        assert_eq!(next(ymd(2024, 1, 8), "20240101", "d 7"), "20240115");
        assert_eq!(next(ymd(2024, 1, 7), "20240101", "d 7"), "20240108");
    }

    #[test]
    fn test_daily_start_equal_to_now_advances() {
        assert_eq!(next(ymd(2024, 1, 1), "20240101", "d 1"), "20240102");
    }

    #[test]
    fn test_daily_start_in_future_takes_one_step() {
        assert_eq!(next(ymd(2024, 1, 1), "20240301", "d 5"), "20240306");
    }

    #[test]
    fn test_daily_is_smallest_multiple() {
        let start = ymd(2023, 11, 20);
        for interval in [1u32, 2, 3, 7, 30, 400] {
            for offset in 0..90 {
                let now = start + chrono::Duration::days(offset);
                let rule = RecurrenceRule::Daily { interval };
                let result = next_occurrence(&rule, start, now).unwrap();
                let k = result.signed_duration_since(start).num_days();
                assert!(result > now);
                assert_eq!(k % i64::from(interval), 0);
                assert!(k >= i64::from(interval));
                // One step earlier would not be after now (or would precede the first step)
                let previous = result - chrono::Duration::days(i64::from(interval));
                assert!(previous <= now || previous == start);
            }
        }
    }

    #[test]
    fn test_yearly() {
        assert_eq!(next(ymd(2024, 1, 1), "20240101", "y"), "20250101");
        assert_eq!(next(ymd(2024, 6, 1), "20100315", "y"), "20250315");
        assert_eq!(next(ymd(2024, 3, 14), "20100315", "y"), "20240315");
        assert_eq!(next(ymd(2020, 1, 1), "20260505", "y"), "20270505");
    }

    #[test]
    fn test_yearly_from_leap_day_projects_from_start() {
        assert_eq!(next(ymd(2024, 2, 28), "20200229", "y"), "20240229");
        assert_eq!(next(ymd(2024, 3, 1), "20200229", "y"), "20250301");
        assert_eq!(next(ymd(2027, 6, 1), "20200229", "y"), "20280229");
    }

    #[test]
    fn test_weekly() {
        // 2024-01-10 is a Wednesday
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "w 1"), "20240115");
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "w 7"), "20240114");
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "w 3"), "20240117");
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "w 4,5"), "20240111");
    }

    #[test]
    fn test_weekly_day_after_start_is_eligible() {
        // 2024-01-01 is a Monday; the Tuesday right after it qualifies
        assert_eq!(next(ymd(2023, 12, 1), "20240101", "w 2"), "20240102");
    }

    #[test]
    fn test_weekly_never_returns_now() {
        let start = ymd(2024, 1, 1);
        let rule = RecurrenceRule::parse("w 1,3,5").unwrap();
        for offset in 0..30 {
            let now = start + chrono::Duration::days(offset);
            let result = next_occurrence(&rule, start, now).unwrap();
            assert!(result > now);
            assert!(result.signed_duration_since(now).num_days() <= 7);
            let mut day = now.succ_opt().unwrap();
            while day < result {
                assert!(![1, 3, 5].contains(&day.weekday().num_days_from_sunday()));
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn test_monthly_last_day() {
        assert_eq!(next(ymd(2024, 2, 27), "20240131", "m -1"), "20240229");
        assert_eq!(next(ymd(2024, 3, 1), "20240101", "m -1"), "20240331");
        assert_eq!(next(ymd(2024, 4, 30), "20240101", "m -1"), "20240531");
    }

    #[test]
    fn test_monthly_second_to_last_day() {
        assert_eq!(next(ymd(2023, 2, 10), "20230101", "m -2"), "20230227");
        assert_eq!(next(ymd(2024, 2, 10), "20240101", "m -2"), "20240228");
    }

    #[test]
    fn test_monthly_skips_short_months() {
        assert_eq!(next(ymd(2024, 4, 5), "20240101", "m 31"), "20240531");
        assert_eq!(next(ymd(2024, 1, 31), "20240101", "m 30"), "20240330");
    }

    #[test]
    fn test_monthly_with_months() {
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "m 1,15 3,6"), "20240301");
        assert_eq!(next(ymd(2024, 3, 1), "20240101", "m 1,15 3,6"), "20240315");
        assert_eq!(next(ymd(2024, 6, 20), "20240101", "m 1,15 3,6"), "20250301");
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "m -1 2"), "20240229");
        assert_eq!(next(ymd(2024, 1, 10), "20240101", "m 30 2,4"), "20240430");
    }

    #[test]
    fn test_monthly_leap_day_only() {
        assert_eq!(next(ymd(2024, 3, 1), "20240101", "m 29 2"), "20280229");
        assert_eq!(next(ymd(2096, 3, 1), "20960101", "m 29 2"), "21040229");
    }

    #[test]
    fn test_monthly_is_earliest_match() {
        let start = ymd(2024, 1, 1);
        let rule = RecurrenceRule::parse("m 10,-1,-2 1,2,7").unwrap();
        let days = [10, -1, -2];
        for offset in 0..400 {
            let now = start + chrono::Duration::days(offset);
            let result = next_occurrence(&rule, start, now).unwrap();
            assert!(result > now);
            assert!([1, 2, 7].contains(&result.month()));
            assert!(matches_month_day(result, &days));
            let mut day = now.succ_opt().unwrap();
            while day < result {
                assert!(![1, 2, 7].contains(&day.month()) || !matches_month_day(day, &days));
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn test_scan_starts_after_future_start() {
        assert_eq!(next(ymd(2024, 1, 1), "20240315", "m 15"), "20240415");
        assert_eq!(next(ymd(2024, 1, 1), "20240315", "m 16"), "20240316");
    }

    #[test]
    fn test_errors() {
        let now = ymd(2024, 1, 10);
        let kind = |start: &str, rule: &str| next_date(now, start, rule).unwrap_err().kind();

        assert_eq!(kind("20240101", "d 0"), RecurErrorKind::OutOfRange);
        assert_eq!(kind("20240101", "w 8"), RecurErrorKind::OutOfRange);
        assert_eq!(kind("20240101", "q 5"), RecurErrorKind::UnknownRuleKind);
        assert_eq!(kind("20240101", ""), RecurErrorKind::EmptyRule);
        assert_eq!(kind("2024-01-01", "d 1"), RecurErrorKind::InvalidStartDate);
        assert_eq!(kind("20240132", "d 1"), RecurErrorKind::InvalidStartDate);
        // Start date is checked before the rule
        assert_eq!(kind("bad", ""), RecurErrorKind::InvalidStartDate);
    }

    #[test]
    fn test_results_past_year_9999_overflow() {
        let now = ymd(9999, 12, 30);
        for rule in ["y", "d 1", "d 400", "w 1", "m 1", "m -1 12"] {
            let err = next_date(now, "99991231", rule).unwrap_err();
            assert_eq!(err.kind(), RecurErrorKind::DateOverflow, "rule {}", rule);
        }
        assert_eq!(next(now, "99991201", "m -1"), "99991231");

        let err = resolve_due_date(ymd(9999, 12, 31), Some("99990101"), "y").unwrap_err();
        assert_eq!(err.kind(), RecurErrorKind::DateOverflow);
    }

    #[test]
    fn test_zero_interval_is_rejected_not_divided() {
        let date = ymd(2024, 1, 1);
        let rule = RecurrenceRule::Daily { interval: 0 };
        let err = next_occurrence(&rule, date, date).unwrap_err();
        assert_eq!(err.kind(), RecurErrorKind::OutOfRange);

        let rule = RecurrenceRule::Daily { interval: 401 };
        assert!(next_occurrence(&rule, date, date).is_err());
    }

    #[test]
    fn test_resolve_due_date_defaults_to_today() {
        let today = ymd(2024, 5, 20);
        assert_eq!(resolve_due_date(today, None, "").unwrap(), "20240520");
        assert_eq!(resolve_due_date(today, Some(""), "").unwrap(), "20240520");
        assert_eq!(resolve_due_date(today, Some("today"), "d 3").unwrap(), "20240520");
    }

    #[test]
    fn test_resolve_due_date_past_dates() {
        let today = ymd(2024, 5, 20);
        assert_eq!(resolve_due_date(today, Some("20240101"), "").unwrap(), "20240520");
        assert_eq!(resolve_due_date(today, Some("20240101"), "d 7").unwrap(), "20240527");
    }

    #[test]
    fn test_resolve_due_date_keeps_today_and_future() {
        let today = ymd(2024, 5, 20);
        assert_eq!(resolve_due_date(today, Some("20240520"), "d 7").unwrap(), "20240520");
        assert_eq!(resolve_due_date(today, Some("20250101"), "").unwrap(), "20250101");
    }

    #[test]
    fn test_resolve_due_date_validates_rule_for_future_dates() {
        let today = ymd(2024, 5, 20);
        let err = resolve_due_date(today, Some("20250101"), "x").unwrap_err();
        assert_eq!(err.kind(), RecurErrorKind::UnknownRuleKind);
        let err = resolve_due_date(today, Some("2025"), "d 1").unwrap_err();
        assert_eq!(err.kind(), RecurErrorKind::InvalidStartDate);
    }
}
