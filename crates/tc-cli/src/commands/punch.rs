//! Punch command appending a clock event to the punch log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Args;
use tc_core::calendar::parse_timestamp;
use tc_core::{Action, Event, parse_log, replay};

use super::util::read_log;

#[derive(Debug, Clone, Args)]
pub struct PunchArgs {
    /// Punch action: i (clock in), o (clock out), p (pause), u (unpause).
    pub action: Action,

    /// Project tag for the punch.
    pub tag: String,

    /// Notes for the activity.
    #[arg(long, short)]
    pub notes: Option<String>,

    /// Punch time as "YYYY-MM-DD HH:MM:SS" instead of now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Runs the punch command.
///
/// The log is replayed first and the punch is refused if it is not legal
/// after the log's last punch. `now` is the local wall-clock time.
pub fn run<W: Write>(
    writer: &mut W,
    log_path: &Path,
    args: &PunchArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let event = build_event(args, now)?;

    let text = read_log(log_path)?;
    let events =
        parse_log(&text).with_context(|| format!("invalid punch log {}", log_path.display()))?;
    let mut machine =
        replay(&events).with_context(|| format!("invalid punch log {}", log_path.display()))?;
    machine.apply(text.lines().count(), &event)?;

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("failed to create punch log directory")?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{event}").with_context(|| format!("failed to write {}", log_path.display()))?;

    tracing::info!(action = %event.action, tag = %event.tag, "punched");
    writeln!(writer, "{event}")?;
    writeln!(writer, "Timer is now {}", machine.phase())?;
    Ok(())
}

fn build_event(args: &PunchArgs, now: NaiveDateTime) -> Result<Event> {
    let tag = args.tag.as_str();
    if tag.is_empty() || tag.trim() != tag || tag.contains("  ") || tag.contains('\n') {
        anyhow::bail!(
            "Invalid tag: {tag:?}. Tags must be non-empty, on one line, \
             without surrounding whitespace or double spaces"
        );
    }
    let notes = args.notes.as_deref().unwrap_or_default().trim().to_string();
    if notes.contains('\n') {
        anyhow::bail!("Invalid notes: notes must fit on a single line");
    }

    let timestamp = match &args.at {
        Some(at) => parse_timestamp(at)
            .with_context(|| format!("Invalid time: {at}. Use YYYY-MM-DD HH:MM:SS"))?,
        None => now.and_utc().timestamp(),
    };

    Ok(Event {
        timestamp,
        action: args.action,
        tag: tag.to_string(),
        notes,
    })
}
