/// Rolling date windows anchored at a fixed reference date.
///
/// The "most recent" date is a configured constant rather than `max(date)`
/// over the data. A dataset that grows past the anchor will not move the
/// window; `main` logs a warning when the two disagree.

use chrono::{Days, NaiveDate};

/// Anchor date of the reference Hawaii dataset.
pub const ANCHOR_DATE: &str = "2017-08-23";

/// Default length of the trailing window used by the time-series queries.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Date format used for stored dates, request parameters and response keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `anchor - days`, by calendar day.
///
/// Saturates at `NaiveDate::MIN` instead of overflowing.
pub fn window_start(anchor: NaiveDate, days: u32) -> NaiveDate {
    anchor
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// The parsed default anchor date.
pub fn default_anchor() -> NaiveDate {
    // 2017-08-23 is always representable.
    NaiveDate::from_ymd_opt(2017, 8, 23).unwrap_or(NaiveDate::MIN)
}

/// Formats a date the way the dataset stores it, for string comparison.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
