//! Iterative Forecaster
//!
//! Produces a 30-day forecast one step at a time. Each prediction is appended
//! to a [`PredictionHistory`] and fed back as the next step's `lag1`; once
//! seven predictions exist, `lag7` and the rolling statistics are taken from
//! the last seven predictions only.
//!
//! During the first six steps `lag7`, `rolling_mean_7` and `rolling_std_7`
//! keep their values seeded from history. The window never blends historical
//! and predicted values.

use chrono::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::features::{feature_row, CalendarFeatures, FeatureMatrix, LagFeatures, WINDOW};
use crate::models::ForecastPoint;
use crate::regression::FittedModel;
use crate::stats;

/// Number of days forecast after the last reading
pub const FORECAST_HORIZON: usize = 30;

/// Append-only buffer of the predictions made so far, indexed by step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionHistory {
    values: Vec<f64>,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<f64> {
        self.values.get(step).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last `WINDOW` predictions, once that many exist
    pub fn window(&self) -> Option<&[f64]> {
        if self.values.len() < WINDOW {
            return None;
        }
        Some(&self.values[self.values.len() - WINDOW..])
    }
}

/// Lag features for step 0, taken from the end of the historical series
pub fn seed_lags(features: &FeatureMatrix) -> Result<LagFeatures> {
    let last_row = features.last_row().ok_or(Error::InsufficientData {
        needed: 1,
        got: 0,
    })?;
    let (Some(&lag1), Some(lag7)) = (features.recent.last(), stats::mean(&features.recent))
    else {
        return Err(Error::InsufficientData {
            needed: WINDOW,
            got: features.recent.len(),
        });
    };

    Ok(LagFeatures {
        lag1,
        lag7,
        rolling_mean_7: last_row.rolling_mean_7,
        rolling_std_7: last_row.rolling_std_7,
    })
}

/// Lag features for the step after the latest prediction in `history`
pub fn next_lags(current: LagFeatures, history: &PredictionHistory) -> LagFeatures {
    let Some(&last) = history.values().last() else {
        return current;
    };

    let mut next = LagFeatures {
        lag1: last,
        ..current
    };

    if let Some(window) = history.window() {
        let window_mean = stats::mean(window).unwrap_or(current.rolling_mean_7);
        next.lag7 = window_mean;
        next.rolling_mean_7 = window_mean;
        next.rolling_std_7 = stats::population_std(window).unwrap_or(current.rolling_std_7);
    }

    next
}

/// Forecast consumption for the `FORECAST_HORIZON` days after the last
/// reading in `features`.
///
/// Any failed step aborts the whole forecast.
pub fn forecast(model: &FittedModel, features: &FeatureMatrix) -> Result<Vec<ForecastPoint>> {
    let mut lags = seed_lags(features)?;
    let last_date = features.last_date().ok_or(Error::InsufficientData {
        needed: 1,
        got: 0,
    })?;
    let mut history = PredictionHistory::new();
    let mut points = Vec::with_capacity(FORECAST_HORIZON);

    for step in 0..FORECAST_HORIZON {
        let date = last_date + Duration::days(step as i64 + 1);
        let row = feature_row(CalendarFeatures::from_date(date), lags);
        let predicted = model.predict(&row)?;

        history.push(predicted);
        points.push(ForecastPoint {
            date,
            predicted_consumption: predicted,
        });
        lags = next_lags(lags, &history);
    }

    debug!(
        first = ?history.get(0),
        last = ?history.get(FORECAST_HORIZON - 1),
        "Forecast steps complete"
    );
    info!(
        start = %points[0].date,
        days = points.len(),
        "Generated consumption forecast"
    );
    Ok(points)
}
