//! Ohm Core Library
//!
//! Electricity consumption analysis for a single household's daily readings:
//! - Feature engineering (calendar, lag and rolling-window features)
//! - Standardized linear regression model
//! - Iterative 30-day forecast with an estimated savings curve
//! - Trend statistics and rule-based saving suggestions
//! - CSV import for meter exports
//! - TOML configuration

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod forecast;
pub mod import;
pub mod models;
pub mod regression;
pub mod savings;
pub mod suggestions;
pub mod trends;

mod stats;

pub use analysis::{analyze_consumption, analyze_consumption_now, build_dashboard};
pub use config::{Config, ImportConfig, OutputFormat};
pub use error::{Error, Result};
pub use features::{build_features, FeatureMatrix};
pub use forecast::{forecast, PredictionHistory, FORECAST_HORIZON};
pub use import::{load_readings, parse_readings};
pub use models::{
    AnalysisReport, Dashboard, FeatureRow, ForecastPoint, Reading, SavingsPoint, Trends,
};
pub use regression::{fit, FittedModel, Standardizer};
pub use savings::estimate_savings;
pub use suggestions::{generate_suggestions, Season};
pub use trends::analyze_trends;
