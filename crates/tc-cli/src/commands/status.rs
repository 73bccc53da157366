//! Status command showing the timer phase after the last punch.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tc_core::calendar::format_timestamp;
use tc_core::{Units, duration_into_units, parse_log, replay};

use super::util::read_log;

pub fn run<W: Write>(writer: &mut W, log_path: &Path, units: Units) -> Result<()> {
    let text = read_log(log_path)?;
    let events =
        parse_log(&text).with_context(|| format!("invalid punch log {}", log_path.display()))?;
    let machine =
        replay(&events).with_context(|| format!("invalid punch log {}", log_path.display()))?;

    writeln!(writer, "Punch log: {}", log_path.display())?;
    writeln!(writer, "Sessions: {}", machine.sessions().len())?;
    writeln!(writer, "Timer: {}", machine.phase())?;

    if let Some(session) = machine.open_session() {
        writeln!(
            writer,
            "Open session: {} since {} ({} as of {})",
            session.tag,
            format_timestamp(session.start_time),
            duration_into_units(session.duration, units),
            format_timestamp(session.last_timestamp)
        )?;
    }

    Ok(())
}
