//! Day keys and timestamp conversion
//!
//! - Day keys: "YYYY-MM-DD" in UTC, used for daily progress and streaks
//! - Timestamps are persisted as Unix milliseconds

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Compute the UTC day key for an instant.
///
/// Returns a string in format "YYYY-MM-DD".
pub fn day_key(now: DateTime<Utc>) -> String {
    format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day())
}

/// Day key for a calendar date
pub fn day_key_of_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a day key back into a calendar date.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Whole days since 1970-01-01 for a day key. Used as a PRNG seed so every
/// user sees the same sample on a given day.
pub fn day_seed(key: &str) -> u64 {
    let Some(date) = parse_day_key(key) else {
        return 0;
    };
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(date);
    (date - epoch).num_days().max(0) as u64
}

pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Convert stored milliseconds back to a timestamp. Out-of-range values
/// collapse to the Unix epoch.
pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key() {
        // 2023-12-28 12:34:56 UTC
        let ts = from_millis(1703766896000);
        assert_eq!(day_key(ts), "2023-12-28");
    }

    #[test]
    fn test_day_seed_is_stable_and_distinct() {
        assert_eq!(day_seed("1970-01-02"), 1);
        assert_eq!(day_seed("2026-03-01"), day_seed("2026-03-01"));
        assert_ne!(day_seed("2026-03-01"), day_seed("2026-03-02"));
        assert_eq!(day_seed("garbage"), 0);
    }

    #[test]
    fn test_millis_roundtrip() {
        let ts = from_millis(1703766896000);
        assert_eq!(to_millis(ts), 1703766896000);
    }
}
