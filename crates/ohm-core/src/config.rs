//! Ohm configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/ohm/config/ohm.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Only loader and output settings live here. The analysis itself (window,
//! horizon, thresholds) is fixed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/ohm.toml");

/// How results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {} (valid: text, json)", s)),
        }
    }
}

/// CSV column resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportConfig {
    /// Header names tried, in order, for the date column
    pub date_columns: Vec<String>,
    /// Header names tried, in order, for the consumption column
    pub consumption_columns: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            date_columns: vec!["Date".to_string(), "date".to_string()],
            consumption_columns: vec!["Usage".to_string(), "consumption".to_string()],
        }
    }
}

/// Output defaults
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Full configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Config {
    pub import: ImportConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load from `path` if given and present, else the default override
    /// location, else the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let override_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let content = match override_path {
            Some(p) if p.exists() => {
                debug!(path = %p.display(), "Loading config override");
                fs::read_to_string(&p)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("ohm").join("config").join("ohm.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    import: Option<RawImport>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    date_columns: Option<Vec<String>>,
    consumption_columns: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    format: Option<String>,
}

/// Parse config from TOML content, filling gaps with defaults
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(import) = raw.import {
        if let Some(columns) = import.date_columns.filter(|c| !c.is_empty()) {
            config.import.date_columns = columns;
        }
        if let Some(columns) = import.consumption_columns.filter(|c| !c.is_empty()) {
            config.import.consumption_columns = columns;
        }
    }

    if let Some(output) = raw.output {
        if let Some(format) = output.format {
            config.output.format = format.parse().map_err(Error::Config)?;
        }
    }

    Ok(config)
}
