//! Invoice command printing per-day line items for one tag as JSON lines.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use tc_core::{Session, filter_sessions, format_line_items, line_items};

use super::util::BoundsArgs;

#[derive(Debug, Clone, Args)]
pub struct InvoiceArgs {
    /// Tag to invoice.
    #[arg(long, short)]
    pub tag: String,

    #[command(flatten)]
    pub bounds: BoundsArgs,
}

/// Runs the invoice command.
pub fn run<W: Write>(writer: &mut W, sessions: &[Session], args: &InvoiceArgs) -> Result<()> {
    let params = args.bounds.to_params(Some(args.tag.clone()))?;
    let sessions = filter_sessions(sessions, &params);
    let items = line_items(&sessions);
    tracing::debug!(tag = %args.tag, days = items.len(), "built invoice");

    write!(writer, "{}", format_line_items(&items)?)?;
    Ok(())
}
