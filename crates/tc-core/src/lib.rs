//! Core logic for the timeclock punch log.
//!
//! This crate turns a punch log into reports:
//! - Tokenizing: one log line becomes an [`Event`]
//! - Punch state machine: events become [`Session`]s with paused time excluded
//! - Reporting: sessions are filtered, grouped by calendar bucket and rendered

pub mod calendar;
pub mod error;
pub mod event;
pub mod format;
pub mod machine;
pub mod report;

pub use error::{ParseValueError, PunchError};
pub use event::{Action, Event, parse_log};
pub use format::{LineItem, format_line_items, format_report, line_items};
pub use machine::{Phase, PunchMachine, Session, parse_sessions, replay, sessions_from_log};
pub use report::{
    Grouping, Report, ReportParams, ReportRow, Units, build_report, duration_into_units,
    filter_sessions, group_sessions,
};
