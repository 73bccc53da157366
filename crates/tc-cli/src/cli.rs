//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::invoice::InvoiceArgs;
use crate::commands::punch::PunchArgs;
use crate::commands::report::ReportArgs;

/// Punch-clock time tracker.
///
/// Reads a log of clock-in, clock-out, pause and unpause punches and reports
/// how long was worked per tag.
#[derive(Debug, Parser)]
#[command(name = "tc", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the punch log, overriding the configured one.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show sessions or grouped totals.
    Report(ReportArgs),

    /// Show per-day invoice line items for one tag as JSON lines.
    Invoice(InvoiceArgs),

    /// Append a punch to the log.
    Punch(PunchArgs),

    /// Show the current timer phase.
    Status,
}
