//! Punch events and the line tokenizer.
//!
//! One punch per line:
//!
//! ```text
//! <action> <YYYY-MM-DD> <HH:MM:SS> <tag>[  <notes>]
//! ```
//!
//! The tag and notes are separated by the first pair of consecutive spaces.

use std::fmt;
use std::str::FromStr;

use crate::calendar;
use crate::error::{ParseValueError, PunchError};

/// What a punch does to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ClockIn,
    ClockOut,
    Pause,
    Unpause,
}

impl Action {
    /// The single-letter code used in the log.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ClockIn => "i",
            Self::ClockOut => "o",
            Self::Pause => "p",
            Self::Unpause => "u",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Action {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(Self::ClockIn),
            "o" => Ok(Self::ClockOut),
            "p" => Ok(Self::Pause),
            "u" => Ok(Self::Unpause),
            _ => Err(ParseValueError::new("action", s)),
        }
    }
}

/// One tokenized punch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Epoch seconds of the punch's wall-clock time.
    pub timestamp: i64,
    pub action: Action,
    pub tag: String,
    /// Free text, empty when the line carries none.
    pub notes: String,
}

impl Event {
    /// Tokenizes one log line. `line` is the 0-based index used in errors.
    pub fn parse(raw: &str, line: usize) -> Result<Self, PunchError> {
        let mut tokens = raw.trim().splitn(4, ' ');

        let code = tokens.next().unwrap_or_default();
        if code.is_empty() {
            return Err(PunchError::MalformedLine { line });
        }
        let action: Action = code.parse().map_err(|_| PunchError::InvalidAction {
            line,
            code: code.to_string(),
        })?;

        let (Some(date), Some(time)) = (tokens.next(), tokens.next()) else {
            return Err(PunchError::MalformedLine { line });
        };
        let timestamp = calendar::parse_timestamp(&format!("{date} {time}"))
            .ok_or(PunchError::InvalidTimestamp { line })?;

        let rest = tokens.next().unwrap_or_default();
        let (tag, notes) = rest.split_once("  ").unwrap_or((rest, ""));
        if tag.is_empty() {
            return Err(PunchError::MalformedLine { line });
        }

        Ok(Self {
            timestamp,
            action,
            tag: tag.to_string(),
            notes: notes.to_string(),
        })
    }
}

/// Renders the event as a log line, the inverse of [`Event::parse`].
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.action,
            calendar::format_timestamp(self.timestamp),
            self.tag
        )?;
        if !self.notes.is_empty() {
            write!(f, "  {}", self.notes)?;
        }
        Ok(())
    }
}

/// Tokenizes a whole punch log.
///
/// Blank lines are skipped but still count toward line indices. Every event
/// is returned with the index of the line it came from.
pub fn parse_log(text: &str) -> Result<Vec<(usize, Event)>, PunchError> {
    text.lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(line, raw)| Event::parse(raw, line).map(|event| (line, event)))
        .collect()
}
