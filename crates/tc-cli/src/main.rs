use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tc_cli::commands::{invoice, punch, report, status, util};
use tc_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(file) = &cli.file {
        config.log_path.clone_from(file);
    }
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Report(args)) => {
            let sessions = util::load_sessions(&config.log_path)?;
            report::run(&mut stdout, &sessions, args, config.units)?;
        }
        Some(Commands::Invoice(args)) => {
            let sessions = util::load_sessions(&config.log_path)?;
            invoice::run(&mut stdout, &sessions, args)?;
        }
        Some(Commands::Punch(args)) => {
            punch::run(&mut stdout, &config.log_path, args, Local::now().naive_local())?;
        }
        Some(Commands::Status) => {
            status::run(&mut stdout, &config.log_path, config.units)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
