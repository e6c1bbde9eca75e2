//! Date labels for articles. Dates are stored as ISO calendar dates
//! (`YYYY-MM-DD`); anything else renders as [`INVALID_DATE`] rather than
//! failing.

use chrono::NaiveDate;

/// The label produced for dates that don't parse.
pub const INVALID_DATE: &str = "Invalid Date";

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO calendar date, returning `None` if it's malformed.
pub fn parse(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), ISO_FORMAT).ok()
}

/// Formats an ISO date as `"{AbbreviatedMonth} {Year}"`, e.g. `"2025-10-26"`
/// becomes `"Oct 2025"`. This is the label shown in article listings.
pub fn format_month_year(iso: &str) -> String {
    match parse(iso) {
        Some(date) => date.format("%b %Y").to_string(),
        None => INVALID_DATE.to_owned(),
    }
}

/// Formats an ISO date as `"October 26, 2025"` for article page headers.
pub fn format_long(iso: &str) -> String {
    match parse(iso) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => INVALID_DATE.to_owned(),
    }
}
