//! Savings Estimator
//!
//! Applies a slowly decaying multiplier to each forecast point: 15% savings
//! on day one, growing by up to 2 percentage points across the horizon,
//! clamped to the 5%-30% range.

use crate::models::{ForecastPoint, SavingsPoint};

/// Multiplier applied to the first forecast point
pub const BASE_FACTOR: f64 = 0.85;

/// Total decrease of the multiplier across the horizon
pub const FACTOR_DECAY: f64 = 0.02;

pub const MIN_FACTOR: f64 = 0.70;
pub const MAX_FACTOR: f64 = 0.95;

/// Savings multiplier for point `index` of `len`
pub fn savings_factor(index: usize, len: usize) -> f64 {
    if len == 0 {
        return BASE_FACTOR;
    }
    (BASE_FACTOR - FACTOR_DECAY * index as f64 / len as f64).clamp(MIN_FACTOR, MAX_FACTOR)
}

/// Estimate consumption after savings measures for each forecast point
pub fn estimate_savings(points: &[ForecastPoint]) -> Vec<SavingsPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| SavingsPoint {
            date: point.date,
            predicted_consumption: point.predicted_consumption,
            savings_prediction: point.predicted_consumption * savings_factor(i, points.len()),
        })
        .collect()
}
