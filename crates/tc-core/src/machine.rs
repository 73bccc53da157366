//! Punch state machine.
//!
//! A single timer is shared by every tag. Each punch moves the timer between
//! phases according to a fixed table; time accrues to the open session only
//! for intervals spent `Running` or `Unpaused`.
//!
//! | phase \ action | `o`  | `i`     | `p`    | `u`      |
//! |----------------|------|---------|--------|----------|
//! | Idle           | -    | Running | -      | -        |
//! | Running        | Idle | -       | Paused | -        |
//! | Paused         | Idle | Running | -      | Unpaused |
//! | Unpaused       | Idle | Running | Paused | -        |

use std::fmt;

use crate::error::PunchError;
use crate::event::{self, Action, Event};

/// Timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    Unpaused,
}

impl Phase {
    /// The phase reached by applying `action`, or `None` if it is illegal.
    #[must_use]
    pub const fn transition(self, action: Action) -> Option<Self> {
        match (self, action) {
            (Self::Idle | Self::Paused | Self::Unpaused, Action::ClockIn) => Some(Self::Running),
            (Self::Running | Self::Paused | Self::Unpaused, Action::ClockOut) => Some(Self::Idle),
            (Self::Running | Self::Unpaused, Action::Pause) => Some(Self::Paused),
            (Self::Paused, Action::Unpause) => Some(Self::Unpaused),
            _ => None,
        }
    }

    /// Whether time spent in this phase counts as worked time.
    #[must_use]
    pub const fn is_ticking(self) -> bool {
        matches!(self, Self::Running | Self::Unpaused)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Unpaused => "unpaused",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One continuous work interval, opened by a clock-in from idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub start_time: i64,
    /// Timestamp of the most recent punch applied to this session.
    pub last_timestamp: i64,
    pub tag: String,
    /// Worked seconds, excluding paused time.
    pub duration: i64,
    pub notes: String,
}

impl Session {
    fn open(event: &Event) -> Self {
        Self {
            start_time: event.timestamp,
            last_timestamp: event.timestamp,
            tag: event.tag.clone(),
            duration: 0,
            notes: event.notes.clone(),
        }
    }
}

/// Parsing context for one punch log.
///
/// Sessions are only ever appended; the last one is the open session that
/// subsequent punches update.
#[derive(Debug, Clone, Default)]
pub struct PunchMachine {
    phase: Phase,
    previous: Phase,
    sessions: Vec<Session>,
}

impl PunchMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one punch. `line` is the 0-based log line used in errors.
    pub fn apply(&mut self, line: usize, event: &Event) -> Result<(), PunchError> {
        let next = self
            .phase
            .transition(event.action)
            .ok_or(PunchError::IllegalTransition {
                line,
                action: event.action,
                phase: self.phase,
            })?;

        if self.phase != Phase::Idle
            && self
                .sessions
                .last()
                .is_some_and(|s| event.timestamp < s.last_timestamp)
        {
            return Err(PunchError::TimestampRegression { line });
        }

        if self.phase == Phase::Idle {
            tracing::debug!(line, tag = %event.tag, "opening session");
            self.sessions.push(Session::open(event));
        } else if let Some(session) = self.sessions.last_mut() {
            if self.phase.is_ticking() {
                let elapsed = event.timestamp - session.last_timestamp;
                tracing::trace!(line, elapsed, tag = %session.tag, "accruing time");
                session.duration += elapsed;
            }
            session.last_timestamp = event.timestamp;
        }

        self.previous = self.phase;
        self.phase = next;

        Ok(())
    }

    /// The phase after the last applied punch.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The phase before the last applied punch.
    pub const fn previous(&self) -> Phase {
        self.previous
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The session still accruing time, if the timer is not idle.
    pub fn open_session(&self) -> Option<&Session> {
        if self.phase == Phase::Idle {
            None
        } else {
            self.sessions.last()
        }
    }

    /// Ends parsing. A log that stops mid-session is accepted as-is.
    pub fn finish(self) -> Vec<Session> {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = %self.phase, "log ends without clocking out");
        }
        self.sessions
    }
}

/// Replays events in order into a fresh machine.
pub fn replay<'a, I>(events: I) -> Result<PunchMachine, PunchError>
where
    I: IntoIterator<Item = &'a (usize, Event)>,
{
    let mut machine = PunchMachine::new();
    for (line, event) in events {
        machine.apply(*line, event)?;
    }
    Ok(machine)
}

/// Runs events through the state machine and returns the sessions.
pub fn parse_sessions(events: &[(usize, Event)]) -> Result<Vec<Session>, PunchError> {
    replay(events).map(PunchMachine::finish)
}

/// Tokenizes a punch log and returns its sessions.
pub fn sessions_from_log(text: &str) -> Result<Vec<Session>, PunchError> {
    let events = event::parse_log(text)?;
    let sessions = parse_sessions(&events)?;
    tracing::debug!(
        events = events.len(),
        sessions = sessions.len(),
        "parsed punch log"
    );
    Ok(sessions)
}
