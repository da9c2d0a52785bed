//! Ohm CLI - Electricity consumption analysis
//!
//! Usage:
//!   ohm analyze --file usage.csv     Trends, suggestions, forecast and savings
//!   ohm forecast --file usage.csv    30-day forecast only
//!   ohm trends --file usage.csv      Trend statistics only
//!   ohm config                       Show resolved configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let ctx = commands::RunContext::resolve(
        cli.config.as_deref(),
        cli.format.as_deref(),
        cli.today.as_deref(),
    )?;

    match cli.command {
        Commands::Analyze { file } => commands::cmd_analyze(&ctx, &file),
        Commands::Trends { file } => commands::cmd_trends(&ctx, &file),
        Commands::Forecast { file } => commands::cmd_forecast(&ctx, &file),
        Commands::Suggest { file } => commands::cmd_suggest(&ctx, &file),
        Commands::Dashboard { file } => commands::cmd_dashboard(&ctx, &file),
        Commands::Config => commands::cmd_config(&ctx, cli.config.as_deref()),
    }
}
