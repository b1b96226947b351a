//! Repeat rule parser
//!
//! Parses the compact rule text stored with a task (`d 7`, `y`, `w 1,3,5`,
//! `m 1,-1 1,6`) into a validated [`RecurrenceRule`].

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::recur::error::{RecurError, RuleField};

pub const MIN_INTERVAL: u32 = 1;
pub const MAX_INTERVAL: u32 = 400;

/// Day-of-month code for the last day of a month
pub const LAST_DAY: i32 = -1;
/// Day-of-month code for the second-to-last day of a month
pub const SECOND_TO_LAST_DAY: i32 = -2;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A validated repeat rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// Every `interval` days
    Daily { interval: u32 },
    /// Every year on the start date
    Yearly,
    /// On the listed weekdays (0=Sunday, 6=Saturday), sorted
    Weekly { weekdays: Vec<u32> },
    /// On the listed days of month (-1 last, -2 second-to-last),
    /// optionally restricted to the listed months (1-12)
    Monthly { days: Vec<i32>, months: Option<Vec<u32>> },
}

impl RecurrenceRule {
    /// Parse and validate a rule string
    ///
    /// Supported formats:
    /// - `d <1-400>` - every N days
    /// - `y` - every year
    /// - `w <1-7>[,...]` - on weekdays, 1=Monday ... 7=Sunday
    /// - `m <day>[,...] [<month>[,...]]` - on days of month, -1 and -2 count from the end
    pub fn parse(rule_str: &str) -> Result<Self, RecurError> {
        let parts: Vec<&str> = rule_str.split_whitespace().collect();

        let Some((&kind, args)) = parts.split_first() else {
            return Err(RecurError::EmptyRule);
        };

        match kind {
            "d" => Self::parse_daily(args),
            "y" => {
                if !args.is_empty() {
                    return Err(RecurError::malformed(
                        RuleField::Rule,
                        "rule 'y' takes no arguments",
                    ));
                }
                Ok(RecurrenceRule::Yearly)
            }
            "w" => Self::parse_weekly(args),
            "m" => Self::parse_monthly(args),
            _ => Err(RecurError::UnknownRuleKind { kind: kind.to_string() }),
        }
    }

    fn parse_daily(args: &[&str]) -> Result<Self, RecurError> {
        let [interval_str] = args else {
            return Err(RecurError::malformed(
                RuleField::Rule,
                "rule 'd' requires exactly one numeric value",
            ));
        };

        let interval = parse_int(
            interval_str,
            RuleField::Interval,
            i64::from(MIN_INTERVAL),
            i64::from(MAX_INTERVAL),
        )?;

        Ok(RecurrenceRule::Daily { interval: interval as u32 })
    }

    fn parse_weekly(args: &[&str]) -> Result<Self, RecurError> {
        let [list] = args else {
            return Err(RecurError::malformed(
                RuleField::Rule,
                "rule 'w' requires one comma-separated list of weekdays",
            ));
        };

        let mut weekdays = Vec::new();
        for day in parse_int_list(list, RuleField::Weekdays, 1, 7)? {
            // External encoding uses 7 for Sunday
            weekdays.push(day as u32 % 7);
        }

        weekdays.sort_unstable();
        weekdays.dedup();

        Ok(RecurrenceRule::Weekly { weekdays })
    }

    fn parse_monthly(args: &[&str]) -> Result<Self, RecurError> {
        let (days_str, months_str) = match args {
            [days] => (*days, None),
            [days, months] => (*days, Some(*months)),
            _ => {
                return Err(RecurError::malformed(
                    RuleField::Rule,
                    "rule 'm' requires a list of days and an optional list of months",
                ))
            }
        };

        let mut days: Vec<i32> = Vec::new();
        let min_day = i64::from(SECOND_TO_LAST_DAY);
        for day in parse_int_list(days_str, RuleField::MonthDays, min_day, 31)? {
            if day == 0 {
                return Err(RecurError::malformed(
                    RuleField::MonthDays,
                    "0 is not a day; use 1-31, -1 for the last day or -2 for the one before",
                ));
            }
            let day = day as i32;
            if !days.contains(&day) {
                days.push(day);
            }
        }

        let months = match months_str {
            Some(list) => {
                let mut months = Vec::new();
                for month in parse_int_list(list, RuleField::Months, 1, 12)? {
                    months.push(month as u32);
                }
                months.sort_unstable();
                months.dedup();
                Some(months)
            }
            None => None,
        };

        if let Some(months) = &months {
            let satisfiable = days.iter().any(|&day| {
                day < 0 || months.iter().any(|&month| day as u32 <= longest_month_length(month))
            });
            if !satisfiable {
                return Err(RecurError::Unsatisfiable {
                    days,
                    months: months.clone(),
                });
            }
        }

        Ok(RecurrenceRule::Monthly { days, months })
    }

    /// Human-readable description, e.g. "every 7 days"
    pub fn describe(&self) -> String {
        match self {
            RecurrenceRule::Daily { interval: 1 } => "every day".to_string(),
            RecurrenceRule::Daily { interval } => format!("every {} days", interval),
            RecurrenceRule::Yearly => "every year".to_string(),
            RecurrenceRule::Weekly { weekdays } => {
                let names: Vec<String> = weekdays
                    .iter()
                    .map(|&d| name_or_number(WEEKDAY_NAMES.get(d as usize), d))
                    .collect();
                format!("weekly on {}", names.join(", "))
            }
            RecurrenceRule::Monthly { days, months } => {
                let days: Vec<String> = days
                    .iter()
                    .map(|&d| match d {
                        LAST_DAY => "last day".to_string(),
                        SECOND_TO_LAST_DAY => "second-to-last day".to_string(),
                        _ => format!("day {}", d),
                    })
                    .collect();
                let mut text = format!("monthly on {}", days.join(", "));
                if let Some(months) = months {
                    let names: Vec<String> = months
                        .iter()
                        .map(|&m| {
                            let name = m.checked_sub(1).and_then(|i| MONTH_NAMES.get(i as usize));
                            name_or_number(name, m)
                        })
                        .collect();
                    text.push_str(&format!(" in {}", names.join(", ")));
                }
                text
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn longest_month_length(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn name_or_number(name: Option<&&str>, number: u32) -> String {
    name.map_or_else(|| number.to_string(), |name| name.to_string())
}

/// Parse one integer and check it against `[min, max]`
fn parse_int(value: &str, field: RuleField, min: i64, max: i64) -> Result<i64, RecurError> {
    let out_of_range = || RecurError::OutOfRange {
        field,
        value: value.to_string(),
        min,
        max,
    };

    let number = value.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
        _ => RecurError::malformed(field, format!("'{}' is not an integer", value)),
    })?;

    if number < min || number > max {
        return Err(out_of_range());
    }
    Ok(number)
}

fn parse_int_list(
    list: &str,
    field: RuleField,
    min: i64,
    max: i64,
) -> Result<Vec<i64>, RecurError> {
    list.split(',')
        .map(|item| {
            if item.is_empty() {
                Err(RecurError::malformed(field, format!("empty element in list '{}'", list)))
            } else {
                parse_int(item, field, min, max)
            }
        })
        .collect()
}
