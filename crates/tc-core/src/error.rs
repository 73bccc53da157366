//! Errors raised while turning a punch log into sessions.

use thiserror::Error;

use crate::event::Action;
use crate::machine::Phase;

/// A fatal problem with one line of the punch log.
///
/// Every variant carries the 0-based index of the offending line. Processing
/// stops at the first error; no sessions are produced for the log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PunchError {
    /// The line does not have an action, a timestamp and a tag.
    #[error("line {line}: malformed punch, expected `<action> <YYYY-MM-DD> <HH:MM:SS> <tag>`")]
    MalformedLine { line: usize },

    /// The action code is not one of `i`, `o`, `p`, `u`.
    #[error("line {line}: invalid action `{code}`, should be one of i, o, p, u")]
    InvalidAction { line: usize, code: String },

    /// The timestamp does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("line {line}: invalid timestamp, expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { line: usize },

    /// The action is not allowed from the current phase.
    #[error("line {line}: wasn't expecting \"{action}\" while {phase}")]
    IllegalTransition {
        line: usize,
        action: Action,
        phase: Phase,
    },

    /// The timestamp is earlier than the previous punch of the open session.
    #[error("line {line}: timestamp goes backwards")]
    TimestampRegression { line: usize },
}

impl PunchError {
    /// The 0-based index of the line that caused the error.
    pub const fn line(&self) -> usize {
        match self {
            Self::MalformedLine { line }
            | Self::InvalidAction { line, .. }
            | Self::InvalidTimestamp { line }
            | Self::IllegalTransition { line, .. }
            | Self::TimestampRegression { line } => *line,
        }
    }
}

/// A string that does not name a known enum value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
