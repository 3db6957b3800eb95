//! FILENAME: core/table-engine/src/dates.rs
//! PURPOSE: Calendar-date recognition for inference, editing and bucketing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Plain date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Naive date-time layouts (no offset). RFC 3339 is handled separately.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a calendar date out of a text value.
///
/// Numeric-looking and boolean-looking strings are never dates, even when a
/// layout could technically accept them. Returns `None` when parsing fails.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() || looks_numeric(trimmed) || looks_boolean(trimmed) {
        return None;
    }
    for layout in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, layout) {
            return Some(date);
        }
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    for layout in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(stamp.date());
        }
    }
    None
}

pub fn looks_numeric(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}

pub fn looks_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// Canonical stored form of a date: `YYYY-MM-DD`.
pub fn normalize(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a date with a strftime pattern. An invalid pattern falls back to
/// the canonical form instead of panicking inside `Display`.
pub fn format_with(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return normalize(date);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_and_us_dates() {
        assert_eq!(parse_date("2024-01-01"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date("2024/02/29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_date("03/15/2023"), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn test_parse_datetimes_take_the_date() {
        assert_eq!(parse_date("2024-06-01T10:30:00Z"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01T10:30:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01 23:59:59"), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn test_numeric_strings_are_not_dates() {
        assert_eq!(parse_date("20240101"), None);
        assert_eq!(parse_date("42"), None);
        assert_eq!(parse_date("true"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Ann"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_format_with_pattern() {
        assert_eq!(format_with(ymd(2024, 1, 5), "%-m/%-d/%Y"), "1/5/2024");
        assert_eq!(format_with(ymd(2024, 1, 5), "%d.%m.%Y"), "05.01.2024");
    }

    #[test]
    fn test_format_with_invalid_pattern_falls_back() {
        assert_eq!(format_with(ymd(2024, 1, 5), "%Q"), "2024-01-05");
    }
}
