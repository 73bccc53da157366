//! Report command printing session durations as tab-separated text.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use tc_core::{Grouping, Session, Units, build_report, format_report};

use super::util::FilterArgs;

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Sum durations per calendar bucket: hour, day, week, month or year.
    #[arg(long, short)]
    pub group: Option<Grouping>,

    /// Units to show durations in: s, m or h.
    #[arg(long, short)]
    pub units: Option<Units>,
}

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    sessions: &[Session],
    args: &ReportArgs,
    default_units: Units,
) -> Result<()> {
    let mut params = args.filter.to_params()?;
    params.grouping = args.group;
    params.units = args.units.unwrap_or(default_units);

    let report = build_report(sessions, &params);
    tracing::debug!(
        grouping = ?params.grouping,
        total_seconds = report.total_duration(),
        "built report"
    );

    write!(writer, "{}", format_report(&report, params.units))?;
    Ok(())
}
