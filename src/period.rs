//! Timestamp parsing and calendar-month bucketing

use crate::error::AnalyticsError;
use chrono::{Datelike, NaiveDateTime};
use std::fmt;

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a raw timestamp string into a `NaiveDateTime`.
///
/// Rows whose timestamps fail to parse are dropped from time-based
/// aggregations by the caller; they are never coerced to an epoch value.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AnalyticsError> {
    let trimmed = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    Err(AnalyticsError::Timestamp(raw.to_string()))
}

/// A calendar-month grouping key.
///
/// Ordering is chronological (year first, then month), so `MonthKey` works
/// directly as a sorted map key for time-series output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_datetime(ts: NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15 08:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15T08:30:00").is_ok());
        assert!(parse_timestamp("  2024-01-15 08:30:00 ").is_ok());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not a date").is_err());
        assert!(parse_timestamp("2024-13-45 99:00:00").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_month_key_ordering_and_display() {
        let jan = parse_timestamp("2024-01-31 23:59:59").unwrap();
        let feb = parse_timestamp("2024-02-01 00:00:00").unwrap();
        let dec_prev = parse_timestamp("2023-12-15 12:00:00").unwrap();

        let jan_key = MonthKey::from_datetime(jan);
        let feb_key = MonthKey::from_datetime(feb);
        let dec_key = MonthKey::from_datetime(dec_prev);

        assert!(dec_key < jan_key);
        assert!(jan_key < feb_key);
        assert_eq!(jan_key.to_string(), "2024-01");
        assert_eq!(dec_key.to_string(), "2023-12");
    }

    #[test]
    fn test_month_key_groups_within_month() {
        let early = parse_timestamp("2024-03-01 00:00:00").unwrap();
        let late = parse_timestamp("2024-03-31 23:59:59").unwrap();
        assert_eq!(
            MonthKey::from_datetime(early),
            MonthKey::from_datetime(late)
        );
    }
}
