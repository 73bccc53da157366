//! Shared utilities for CLI commands.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;
use tc_core::calendar::month_start;
use tc_core::{ReportParams, Session};

/// Pre-compiled regex for `YYYY-MM` month bounds.
static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

/// Month bounds shared by the report and invoice commands.
#[derive(Debug, Clone, Default, Args)]
pub struct BoundsArgs {
    /// Only include sessions starting in or after this month (YYYY-MM).
    #[arg(long, short)]
    pub begin: Option<String>,

    /// Only include sessions ending before this month (YYYY-MM).
    #[arg(long, short)]
    pub end: Option<String>,
}

impl BoundsArgs {
    /// Converts the bounds into report parameters for `tag`, validating months.
    pub fn to_params(&self, tag: Option<String>) -> Result<ReportParams> {
        Ok(ReportParams {
            tag,
            begin: self.begin.as_deref().map(parse_month).transpose()?,
            end: self.end.as_deref().map(parse_month).transpose()?,
            ..ReportParams::default()
        })
    }
}

/// Optional tag filter plus month bounds.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only include sessions with exactly this tag.
    #[arg(long, short)]
    pub tag: Option<String>,

    #[command(flatten)]
    pub bounds: BoundsArgs,
}

impl FilterArgs {
    /// Converts the filters into report parameters, validating month bounds.
    pub fn to_params(&self) -> Result<ReportParams> {
        self.bounds.to_params(self.tag.clone())
    }
}

/// Parse a `YYYY-MM` month into the epoch second of its first instant.
pub fn parse_month(s: &str) -> Result<i64> {
    let Some(caps) = MONTH_RE.captures(s) else {
        anyhow::bail!("Invalid month: {s}. Use YYYY-MM (e.g., 2024-01)");
    };

    let year: i32 = caps[1].parse().context("failed to parse year")?;
    let month: u32 = caps[2].parse().context("failed to parse month")?;

    month_start(year, month).with_context(|| format!("Invalid month: {s}. Month must be 01-12"))
}

/// Reads the punch log, treating a missing file as an empty log.
pub fn read_log(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "punch log does not exist yet");
            Ok(String::new())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Reads the punch log and runs it through the punch state machine.
pub fn load_sessions(path: &Path) -> Result<Vec<Session>> {
    let text = read_log(path)?;
    tc_core::sessions_from_log(&text)
        .with_context(|| format!("invalid punch log {}", path.display()))
}
