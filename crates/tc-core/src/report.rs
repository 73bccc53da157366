//! Session filtering and calendar grouping.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calendar::bucket_key;
use crate::error::ParseValueError;
use crate::machine::Session;

/// Calendar granularity for grouped reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Grouping {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grouping {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" | "h" => Ok(Self::Hour),
            "day" | "d" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "year" | "y" => Ok(Self::Year),
            _ => Err(ParseValueError::new("grouping", s)),
        }
    }
}

/// Unit a duration is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "m")]
    Minutes,
    #[serde(rename = "h")]
    Hours,
}

impl Units {
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
        }
    }

    /// Seconds in one unit.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3600,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Units {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(Self::Seconds),
            "m" => Ok(Self::Minutes),
            "h" => Ok(Self::Hours),
            _ => Err(ParseValueError::new("units", s)),
        }
    }
}

/// Renders a duration in seconds in the given unit.
///
/// Whole multiples print as integers. Anything else is rounded half to even
/// to two decimals and keeps its decimal point: `5400s` in hours is `1.5h`,
/// `61s` in minutes is `1.02m`, `7201s` in hours is `2.0h`.
#[allow(clippy::cast_precision_loss)]
pub fn duration_into_units(seconds: i64, units: Units) -> String {
    let per_unit = units.seconds();
    let suffix = units.suffix();
    if seconds % per_unit == 0 {
        return format!("{}{suffix}", seconds / per_unit);
    }
    let hundredths = round_half_even(seconds * 100, per_unit);
    let value = hundredths as f64 / 100.0;
    format!("{value:?}{suffix}")
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
const fn round_half_even(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    let twice_remainder = numerator.rem_euclid(denominator) * 2;
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Which sessions to report on and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParams {
    /// Keep only sessions with exactly this tag.
    pub tag: Option<String>,
    /// Inclusive lower bound on `start_time`.
    pub begin: Option<i64>,
    /// Exclusive upper bound on `last_timestamp`.
    pub end: Option<i64>,
    pub grouping: Option<Grouping>,
    pub units: Units,
}

/// Summed duration of every session with the same bucket and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub bucket_key: String,
    pub tag: String,
    pub total_duration: i64,
}

/// Result of running a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Filtered sessions, sorted by start time then tag.
    Sessions(Vec<Session>),
    /// Per-bucket totals, sorted by bucket then tag.
    Grouped {
        grouping: Grouping,
        rows: Vec<ReportRow>,
    },
}

impl Report {
    /// Total seconds covered by the report.
    pub fn total_duration(&self) -> i64 {
        match self {
            Self::Sessions(sessions) => sessions.iter().map(|s| s.duration).sum(),
            Self::Grouped { rows, .. } => rows.iter().map(|r| r.total_duration).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sessions(sessions) => sessions.is_empty(),
            Self::Grouped { rows, .. } => rows.is_empty(),
        }
    }
}

/// Sorts sessions by `(start_time, tag)` and applies the tag and time filters.
pub fn filter_sessions(sessions: &[Session], params: &ReportParams) -> Vec<Session> {
    let mut kept: Vec<Session> = sessions.to_vec();
    kept.sort_by(|a, b| (a.start_time, &a.tag).cmp(&(b.start_time, &b.tag)));

    if let Some(tag) = &params.tag {
        kept.retain(|s| &s.tag == tag);
    }
    if let Some(begin) = params.begin {
        kept.retain(|s| s.start_time >= begin);
    }
    if let Some(end) = params.end {
        kept.retain(|s| s.last_timestamp < end);
    }

    tracing::debug!(
        total = sessions.len(),
        kept = kept.len(),
        "filtered sessions"
    );
    kept
}

/// Sums session durations per `(bucket, tag)`.
///
/// Sessions are bucketed by their start time only; a session spanning
/// midnight counts entirely toward the day it started.
pub fn group_sessions(sessions: &[Session], grouping: Grouping) -> Vec<ReportRow> {
    let mut keyed: Vec<(String, &Session)> = sessions
        .par_iter()
        .map(|s| (bucket_key(s.start_time, grouping), s))
        .collect();
    keyed.sort_by(|(ka, a), (kb, b)| (ka, &a.tag).cmp(&(kb, &b.tag)));

    let mut rows: Vec<ReportRow> = Vec::new();
    for (key, session) in keyed {
        match rows.last_mut() {
            Some(last) if last.bucket_key == key && last.tag == session.tag => {
                last.total_duration += session.duration;
            }
            _ => rows.push(ReportRow {
                bucket_key: key,
                tag: session.tag.clone(),
                total_duration: session.duration,
            }),
        }
    }
    rows
}

/// Filters the sessions and groups them if a grouping is requested.
pub fn build_report(sessions: &[Session], params: &ReportParams) -> Report {
    let filtered = filter_sessions(sessions, params);
    match params.grouping {
        None => Report::Sessions(filtered),
        Some(grouping) => Report::Grouped {
            grouping,
            rows: group_sessions(&filtered, grouping),
        },
    }
}
