//! CLI subcommand implementations.

pub mod invoice;
pub mod punch;
pub mod report;
pub mod status;
pub mod util;
