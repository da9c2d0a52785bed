//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ohm - Understand and reduce your electricity consumption
#[derive(Parser)]
#[command(name = "ohm")]
#[command(about = "Electricity consumption analysis and forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: text or json (overrides the config file)
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Treat this date (YYYY-MM-DD) as today for seasonal suggestions
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full analysis: trends, suggestions, forecast and savings
    Analyze {
        /// CSV file with Date/Usage (or date/consumption) columns
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Trend statistics only
    Trends {
        /// CSV file with readings
        #[arg(short, long)]
        file: PathBuf,
    },

    /// 30-day consumption forecast with estimated savings
    Forecast {
        /// CSV file with readings
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Energy-saving suggestions
    Suggest {
        /// CSV file with readings
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Readings plus their full analysis
    Dashboard {
        /// CSV file with readings
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the resolved configuration
    Config,
}
