//! Data models for Ohm

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single daily meter reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub date: NaiveDate,
    pub consumption: f64,
}

impl Reading {
    pub fn new(date: NaiveDate, consumption: f64) -> Self {
        Self { date, consumption }
    }
}

/// Reject a dataset that contains unusable readings.
///
/// Consumption must be finite and non-negative, and dates must be in
/// ascending order (equal dates are tolerated).
pub fn validate_readings(readings: &[Reading]) -> Result<()> {
    for (i, reading) in readings.iter().enumerate() {
        if !reading.consumption.is_finite() {
            return Err(Error::InvalidReading(format!(
                "non-finite consumption on {}",
                reading.date
            )));
        }
        if reading.consumption < 0.0 {
            return Err(Error::InvalidReading(format!(
                "negative consumption {} on {}",
                reading.consumption, reading.date
            )));
        }
        if i > 0 && reading.date < readings[i - 1].date {
            return Err(Error::InvalidReading(format!(
                "readings out of order: {} follows {}",
                reading.date,
                readings[i - 1].date
            )));
        }
    }
    Ok(())
}

/// Number of model features
pub const FEATURE_COUNT: usize = 8;

/// Feature column names, in matrix order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "dayofweek",
    "month",
    "day",
    "isoweek",
    "lag1",
    "lag7",
    "rolling_mean_7",
    "rolling_std_7",
];

/// One fully-populated row of the feature matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Monday = 0 .. Sunday = 6
    pub dayofweek: u32,
    pub month: u32,
    pub day: u32,
    /// ISO 8601 week number
    pub isoweek: u32,
    pub lag1: f64,
    pub lag7: f64,
    pub rolling_mean_7: f64,
    pub rolling_std_7: f64,
}

impl FeatureRow {
    /// Values in `FEATURE_NAMES` order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.dayofweek as f64,
            self.month as f64,
            self.day as f64,
            self.isoweek as f64,
            self.lag1,
            self.lag7,
            self.rolling_mean_7,
            self.rolling_std_7,
        ]
    }
}

/// A predicted daily consumption value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_consumption: f64,
}

/// A forecast point with its estimated consumption after savings measures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsPoint {
    pub date: NaiveDate,
    pub predicted_consumption: f64,
    pub savings_prediction: f64,
}

/// Descriptive statistics over the historical series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub daily_average: f64,
    pub peak_usage: f64,
    #[serde(with = "peak_time_format")]
    pub peak_time: NaiveDateTime,
    /// Day of week (Monday = 0) -> mean consumption, observed days only
    pub weekly_pattern: BTreeMap<u32, f64>,
    /// Month-end date -> mean consumption; `None` for a month with no readings
    pub monthly_trend: BTreeMap<NaiveDate, Option<f64>>,
    pub weekday_average: Option<f64>,
    pub weekend_average: Option<f64>,
    /// Least-squares slope of consumption against row index
    pub consumption_trend: f64,
}

/// Full result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub trends: Trends,
    pub suggestions: Vec<String>,
    pub predictions: Vec<ForecastPoint>,
    pub savings_predictions: Vec<SavingsPoint>,
}

/// Dashboard payload: raw readings plus their analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub message: String,
    pub data: Option<Vec<Reading>>,
    pub analysis: Option<AnalysisReport>,
}

/// `peak_time` is exchanged as `YYYY-MM-DD HH:MM`
mod peak_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
