// Date helpers for the command layer

use chrono::{Local, NaiveDate};
use crate::recur::{parse_date, truncate_to_day};

/// Alternative date format accepted in list searches (e.g. 15.03.2024)
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Today's date in local time
pub fn today() -> NaiveDate {
    truncate_to_day(Local::now().naive_local())
}

/// Interpret a list search term as a date, if it looks like one
///
/// Accepts YYYYMMDD and DD.MM.YYYY.
pub fn parse_search_date(query: &str) -> Option<NaiveDate> {
    let query = query.trim();
    parse_date(query).or_else(|| NaiveDate::parse_from_str(query, SEARCH_DATE_FORMAT).ok())
}
