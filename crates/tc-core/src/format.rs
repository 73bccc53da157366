//! Rendering of reports as tab-separated text and invoice line items.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use serde::Serialize;

use crate::calendar::{day_key, display_key, format_timestamp};
use crate::machine::Session;
use crate::report::{Grouping, Report, ReportRow, Units, duration_into_units};

const SESSIONS_HEADER: &str = "start\tend\tduration\ttag";
const ROWS_HEADER: &str = "bucket\ttag\tduration";

/// One session per line: start, end, duration, tag.
pub fn format_sessions(sessions: &[Session], units: Units) -> String {
    let mut output = String::new();
    writeln!(output, "{SESSIONS_HEADER}").unwrap();
    for session in sessions {
        writeln!(
            output,
            "{}\t{}\t{}\t{}",
            format_timestamp(session.start_time),
            format_timestamp(session.last_timestamp),
            duration_into_units(session.duration, units),
            session.tag
        )
        .unwrap();
    }
    output
}

/// One grouped row per line: bucket, tag, duration.
pub fn format_rows(rows: &[ReportRow], grouping: Grouping, units: Units) -> String {
    let mut output = String::new();
    writeln!(output, "{ROWS_HEADER}").unwrap();
    for row in rows {
        writeln!(
            output,
            "{}\t{}\t{}",
            display_key(&row.bucket_key, grouping),
            row.tag,
            duration_into_units(row.total_duration, units)
        )
        .unwrap();
    }
    output
}

pub fn format_report(report: &Report, units: Units) -> String {
    match report {
        Report::Sessions(sessions) => format_sessions(sessions, units),
        Report::Grouped { grouping, rows } => format_rows(rows, *grouping, units),
    }
}

// ========== Invoice ==========

/// A per-day invoicing record for one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Distinct non-empty notes of the day, one per line.
    pub notes: String,
    /// Worked hours.
    pub quantity: f64,
}

/// Groups sessions by the day they started.
///
/// Callers pass the sessions of a single tag; tags are not separated here.
#[allow(clippy::cast_precision_loss)]
pub fn line_items(sessions: &[Session]) -> Vec<LineItem> {
    let mut days: BTreeMap<String, (BTreeSet<&str>, i64)> = BTreeMap::new();
    for session in sessions {
        let (notes, seconds) = days.entry(day_key(session.start_time)).or_default();
        if !session.notes.is_empty() {
            notes.insert(session.notes.as_str());
        }
        *seconds += session.duration;
    }

    days.into_iter()
        .map(|(date, (notes, seconds))| LineItem {
            date,
            notes: notes.into_iter().collect::<Vec<_>>().join("\n"),
            quantity: seconds as f64 / 3600.0,
        })
        .collect()
}

/// Serializes line items as JSON, one object per line.
pub fn format_line_items(items: &[LineItem]) -> serde_json::Result<String> {
    let mut output = String::new();
    for item in items {
        output.push_str(&serde_json::to_string(item)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_timestamp;
    use crate::machine::sessions_from_log;
    use crate::report::{ReportParams, build_report};
    use insta::assert_snapshot;

    fn session(start: &str, end: &str, duration: i64, notes: &str) -> Session {
        Session {
            start_time: parse_timestamp(start).unwrap(),
            last_timestamp: parse_timestamp(end).unwrap(),
            tag: "acme".to_string(),
            duration,
            notes: notes.to_string(),
        }
    }

    const LOG: &str = "\
i 2024-01-01 09:00:00 work  start
p 2024-01-01 10:00:00 work
u 2024-01-01 10:15:00 work
o 2024-01-01 11:00:00 work
i 2024-01-01 13:00:00 admin  email
o 2024-01-01 13:30:00 admin
i 2024-01-02 09:00:00 work  review
o 2024-01-02 09:45:00 work
";

    #[test]
    fn ungrouped_sessions_in_hours() {
        let sessions = sessions_from_log(LOG).unwrap();
        let report = build_report(&sessions, &ReportParams::default());
        assert_snapshot!(format_report(&report, Units::Hours), @r"
        start	end	duration	tag
        2024-01-01 09:00:00	2024-01-01 11:00:00	1.75h	work
        2024-01-01 13:00:00	2024-01-01 13:30:00	0.5h	admin
        2024-01-02 09:00:00	2024-01-02 09:45:00	0.75h	work
        ");
    }

    #[test]
    fn grouped_by_day_in_minutes() {
        let sessions = sessions_from_log(LOG).unwrap();
        let params = ReportParams {
            grouping: Some(Grouping::Day),
            ..ReportParams::default()
        };
        let report = build_report(&sessions, &params);
        assert_snapshot!(format_report(&report, Units::Minutes), @r"
        bucket	tag	duration
        2024-01-01	admin	30m
        2024-01-01	work	105m
        2024-01-02	work	45m
        ");
    }

    #[test]
    fn grouped_by_hour_shows_hour_start() {
        let sessions = sessions_from_log(LOG).unwrap();
        let rows = crate::report::group_sessions(&sessions, Grouping::Hour);
        let output = format_rows(&rows, Grouping::Hour, Units::Seconds);
        assert_eq!(
            output.lines().nth(1),
            Some("2024-01-01 09:00:00\twork\t6300s")
        );
    }

    #[test]
    fn empty_report_is_header_only() {
        assert_eq!(format_sessions(&[], Units::Seconds), "start\tend\tduration\ttag\n");
        assert_eq!(
            format_rows(&[], Grouping::Day, Units::Seconds),
            "bucket\ttag\tduration\n"
        );
    }

    // ========== Invoice ==========

    #[test]
    fn line_items_group_by_day_and_dedupe_notes() {
        let sessions = vec![
            session("2024-01-02 09:00:00", "2024-01-02 10:00:00", 3600, "review"),
            session("2024-01-01 09:00:00", "2024-01-01 10:30:00", 5400, "build"),
            session("2024-01-01 13:00:00", "2024-01-01 13:15:00", 900, "build"),
            session("2024-01-01 15:00:00", "2024-01-01 15:45:00", 2700, "calls"),
            session("2024-01-01 17:00:00", "2024-01-01 17:15:00", 900, ""),
        ];
        let items = line_items(&sessions);
        assert_eq!(
            items,
            vec![
                LineItem {
                    date: "2024-01-01".into(),
                    notes: "build\ncalls".into(),
                    quantity: 2.75,
                },
                LineItem {
                    date: "2024-01-02".into(),
                    notes: "review".into(),
                    quantity: 1.0,
                },
            ]
        );
    }

    #[test]
    fn line_items_serialize_as_json_lines() {
        let sessions = vec![
            session("2024-01-01 09:00:00", "2024-01-01 10:45:00", 6300, "start"),
            session("2024-01-03 09:00:00", "2024-01-03 09:20:00", 1200, ""),
        ];
        let output = format_line_items(&line_items(&sessions)).unwrap();
        assert_snapshot!(output, @r#"
        {"date":"2024-01-01","notes":"start","quantity":1.75}
        {"date":"2024-01-03","notes":"","quantity":0.3333333333333333}
        "#);
    }

    #[test]
    fn no_sessions_no_line_items() {
        assert!(line_items(&[]).is_empty());
        assert_eq!(format_line_items(&[]).unwrap(), "");
    }
}
