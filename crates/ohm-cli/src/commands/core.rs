//! Shared command utilities: run context, reading loader, JSON output

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use ohm_core::{load_readings, Config, OutputFormat, Reading};
use serde::Serialize;
use tracing::debug;

/// Settings resolved once from global flags and the config file
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub format: OutputFormat,
    pub today: NaiveDate,
}

impl RunContext {
    /// Resolve config, output format and the effective date
    ///
    /// `--format` wins over the config file; `--today` defaults to the local date.
    pub fn resolve(
        config_path: Option<&Path>,
        format: Option<&str>,
        today: Option<&str>,
    ) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load config")?;

        let format = match format {
            Some(f) => f.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
            None => config.output.format,
        };

        let today = match today {
            Some(t) => NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .context("Invalid --today date format (use YYYY-MM-DD)")?,
            None => Local::now().date_naive(),
        };

        debug!(format = %format, today = %today, "Resolved run context");

        Ok(Self {
            config,
            format,
            today,
        })
    }
}

/// Load readings from a CSV file using the configured column aliases
pub fn read_file(ctx: &RunContext, file: &Path) -> Result<Vec<Reading>> {
    let readings = load_readings(file, &ctx.config.import)
        .with_context(|| format!("Failed to load readings from {}", file.display()))?;
    debug!(count = readings.len(), "Loaded readings");
    Ok(readings)
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
