//! Fade trading engine CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The [logging] section drives format and file target; a config that
    // fails to load falls back to defaults and the command itself reports
    // the error. The --json-logs flag and --log-level override the file.
    let logging = fade_config::load_config(&cli.config)
        .map(|c| c.logging)
        .unwrap_or_default();
    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    let format = if cli.json_logs { "json" } else { &logging.format };
    setup_logging(log_level, format, logging.file.as_deref().map(Path::new))?;

    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
