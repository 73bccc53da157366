//! Calendar math over epoch seconds.
//!
//! Punch timestamps are wall-clock times without a zone. They are stored as
//! epoch seconds by reading the wall clock as UTC, and every derivation here
//! reads them back the same way, so results never depend on the host timezone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::report::Grouping;

/// Format of the timestamp in a punch line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a `YYYY-MM-DD HH:MM:SS` wall-clock time into epoch seconds.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Converts epoch seconds back to the wall-clock time they were read from.
///
/// Values outside chrono's range collapse to the epoch.
pub fn wall_clock(timestamp: i64) -> NaiveDateTime {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .naive_utc()
}

/// Renders epoch seconds as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: i64) -> String {
    wall_clock(timestamp).format(TIMESTAMP_FORMAT).to_string()
}

/// Renders epoch seconds as the `YYYY-MM-DD` calendar day.
pub fn day_key(timestamp: i64) -> String {
    bucket_key(timestamp, Grouping::Day)
}

/// Derives the bucket a timestamp falls into for the given grouping.
///
/// | grouping | key             |
/// |----------|-----------------|
/// | year     | `YYYY`          |
/// | month    | `YYYY-MM`       |
/// | week     | `YYYY-WW` (ISO) |
/// | day      | `YYYY-MM-DD`    |
/// | hour     | `YYYY-MM-DD-HH` |
///
/// Weeks follow ISO 8601: they start on Monday, week 01 is the week holding
/// the year's first Thursday, and the year is the ISO week-year. Dates around
/// New Year can therefore land in the neighbouring year's bucket.
pub fn bucket_key(timestamp: i64, grouping: Grouping) -> String {
    let dt = wall_clock(timestamp);
    match grouping {
        Grouping::Year => format!("{:04}", dt.year()),
        Grouping::Month => format!("{:04}-{:02}", dt.year(), dt.month()),
        Grouping::Week => {
            let week = dt.iso_week();
            format!("{:04}-{:02}", week.year(), week.week())
        }
        Grouping::Day => format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day()),
        Grouping::Hour => format!(
            "{:04}-{:02}-{:02}-{:02}",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour()
        ),
    }
}

/// Turns a bucket key into the label shown in grouped reports.
///
/// Hour buckets read as the timestamp of the start of the hour; every other
/// bucket is shown as-is.
pub fn display_key(key: &str, grouping: Grouping) -> String {
    if grouping != Grouping::Hour {
        return key.to_string();
    }
    NaiveDateTime::parse_from_str(&format!("{key}:00:00"), "%Y-%m-%d-%H:%M:%S").map_or_else(
        |_| key.to_string(),
        |dt| dt.format(TIMESTAMP_FORMAT).to_string(),
    )
}

/// Epoch seconds of midnight on the first day of the given month.
pub fn month_start(year: i32, month: u32) -> Option<i64> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
