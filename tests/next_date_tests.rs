use chrono::{Datelike, NaiveDate};
use tasksched::recur::{
    format_date, next_date, next_occurrence, parse_date, RecurErrorKind, RecurrenceRule,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_daily_boundary_scenario() {
    // start+7 (01-08) is not after now, start+14 is
    assert_eq!(next_date(ymd(2024, 1, 10), "20240101", "d 7").unwrap(), "20240115");
}

#[test]
fn test_monthly_last_day_in_leap_february() {
    assert_eq!(next_date(ymd(2024, 2, 27), "20240131", "m -1").unwrap(), "20240229");
}

#[test]
fn test_monthly_last_day_of_march() {
    assert_eq!(next_date(ymd(2024, 3, 1), "20240101", "m -1").unwrap(), "20240331");
}

#[test]
fn test_rejected_rules() {
    let now = ymd(2024, 1, 10);
    let kind = |start: &str, rule: &str| next_date(now, start, rule).unwrap_err().kind();

    assert_eq!(kind("20240101", "d 0"), RecurErrorKind::OutOfRange);
    assert_eq!(kind("20240101", "w 8"), RecurErrorKind::OutOfRange);
    assert_eq!(kind("20240101", "q 5"), RecurErrorKind::UnknownRuleKind);
    assert_eq!(kind("20240101", ""), RecurErrorKind::EmptyRule);
    assert_eq!(kind("20240101", "m 1,x"), RecurErrorKind::MalformedField);
    assert_eq!(kind("01/01/2024", "d 1"), RecurErrorKind::InvalidStartDate);
}

#[test]
fn test_last_representable_year() {
    let now = ymd(9999, 12, 30);
    let err = next_date(now, "99991231", "y").unwrap_err();
    assert_eq!(err.kind(), RecurErrorKind::DateOverflow);
    assert_eq!(next_date(now, "99990101", "d 1").unwrap(), "99991231");
}

#[test]
fn test_result_is_always_after_now_and_round_trips() {
    let rules = [
        "d 1", "d 3", "d 400", "y", "w 7", "w 1,2,3,4,5", "m 1", "m -1,-2", "m 31", "m 15 2,8",
    ];
    let start = ymd(2023, 12, 30);

    for rule_text in rules {
        let rule = RecurrenceRule::parse(rule_text).unwrap();
        for offset in [-40i64, -1, 0, 1, 2, 27, 58, 59, 60, 365, 366, 800] {
            let now = start + chrono::Duration::days(offset);
            let next = next_occurrence(&rule, start, now).unwrap();
            assert!(next > now, "{} from {} after {} gave {}", rule_text, start, now, next);
            assert!(next > start);

            let text = next_date(now, &format_date(start), rule_text).unwrap();
            assert_eq!(parse_date(&text), Some(next));
        }
    }
}

#[test]
fn test_yearly_is_whole_years_from_start() {
    let start = ymd(2019, 7, 4);
    for offset in 0..1500 {
        let now = start + chrono::Duration::days(offset);
        let next = next_occurrence(&RecurrenceRule::Yearly, start, now).unwrap();
        assert_eq!((next.month(), next.day()), (7, 4));
        assert!(next > now);
        // The previous anniversary is not after now (or is the start itself)
        let previous = ymd(next.year() - 1, 7, 4);
        assert!(previous <= now || previous == start);
    }
}

#[test]
fn test_weekly_sunday_encoding() {
    // 2024-01-13 is a Saturday
    let now = ymd(2024, 1, 13);
    assert_eq!(next_date(now, "20240101", "w 7").unwrap(), "20240114");
    assert_eq!(next_date(now, "20240101", "w 6").unwrap(), "20240120");
}

#[test]
fn test_monthly_month_filter() {
    assert_eq!(next_date(ymd(2024, 1, 10), "20240101", "m 1,15 3,6").unwrap(), "20240301");
    assert_eq!(next_date(ymd(2024, 12, 31), "20240101", "m 1 1").unwrap(), "20250101");
}
