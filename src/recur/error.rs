use std::fmt;
use thiserror::Error;

/// Part of a rule string an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    /// The rule as a whole (token count)
    Rule,
    Interval,
    Weekdays,
    MonthDays,
    Months,
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleField::Rule => "rule",
            RuleField::Interval => "interval",
            RuleField::Weekdays => "weekday",
            RuleField::MonthDays => "day of month",
            RuleField::Months => "month",
        };
        f.write_str(name)
    }
}

/// Validation failures of the recurrence engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurError {
    #[error("invalid start date '{input}': expected YYYYMMDD")]
    InvalidStartDate { input: String },

    #[error("repeat rule is empty")]
    EmptyRule,

    #[error("unknown repeat rule kind '{kind}' (expected d, y, w or m)")]
    UnknownRuleKind { kind: String },

    #[error("malformed {field}: {reason}")]
    MalformedField { field: RuleField, reason: String },

    #[error("{field} must be in range [{min}, {max}]: got {value}")]
    OutOfRange {
        field: RuleField,
        value: String,
        min: i64,
        max: i64,
    },

    #[error(
        "no listed day of month exists in the listed months (days {days:?}, months {months:?})"
    )]
    Unsatisfiable { days: Vec<i32>, months: Vec<u32> },

    #[error("no occurrence found within the search window")]
    NoOccurrence,

    #[error("date arithmetic overflowed the supported calendar range")]
    DateOverflow,
}

/// Machine-readable reason, for callers that map failures to their own messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurErrorKind {
    InvalidStartDate,
    EmptyRule,
    UnknownRuleKind,
    MalformedField,
    OutOfRange,
    Unsatisfiable,
    NoOccurrence,
    DateOverflow,
}

impl RecurError {
    pub fn kind(&self) -> RecurErrorKind {
        match self {
            RecurError::InvalidStartDate { .. } => RecurErrorKind::InvalidStartDate,
            RecurError::EmptyRule => RecurErrorKind::EmptyRule,
            RecurError::UnknownRuleKind { .. } => RecurErrorKind::UnknownRuleKind,
            RecurError::MalformedField { .. } => RecurErrorKind::MalformedField,
            RecurError::OutOfRange { .. } => RecurErrorKind::OutOfRange,
            RecurError::Unsatisfiable { .. } => RecurErrorKind::Unsatisfiable,
            RecurError::NoOccurrence => RecurErrorKind::NoOccurrence,
            RecurError::DateOverflow => RecurErrorKind::DateOverflow,
        }
    }

    pub(crate) fn malformed(field: RuleField, reason: impl Into<String>) -> Self {
        RecurError::MalformedField { field, reason: reason.into() }
    }
}
