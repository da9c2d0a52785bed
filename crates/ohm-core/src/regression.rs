//! Forecast Model: standardized ordinary least squares
//!
//! Each feature column is standardized with parameters learned at fit time,
//! then consumption is regressed on the standardized features with an
//! intercept. The least-squares problem is solved through an SVD so that
//! rank-deficient designs (fewer rows than features, collinear lag columns,
//! constant columns) still yield the minimum-norm solution.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{FeatureRow, FEATURE_COUNT, FEATURE_NAMES};

/// Minimum training rows for a fit
pub const MIN_TRAINING_ROWS: usize = 2;

/// Per-column standardization learned from the training matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standardizer {
    pub means: [f64; FEATURE_COUNT],
    /// Population standard deviation; 1.0 for zero-variance columns
    pub scales: [f64; FEATURE_COUNT],
}

impl Standardizer {
    /// Learn column means and scales
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut means = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];

        for col in 0..FEATURE_COUNT {
            let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n;
            let variance = rows.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            means[col] = mean;
            scales[col] = if std > 0.0 { std } else { 1.0 };
        }

        Self { means, scales }
    }

    /// Apply the learned transform to one row
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            out[col] = (row[col] - self.means[col]) / self.scales[col];
        }
        out
    }
}

/// A fitted consumption model.
///
/// Created by [`fit`], used for one forecast run, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedModel {
    pub standardizer: Standardizer,
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

impl FittedModel {
    /// Predict consumption for a single feature row using the training-time
    /// standardization
    pub fn predict(&self, row: &FeatureRow) -> Result<f64> {
        let raw = row.to_array();
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidReading(format!(
                "non-finite feature row: {:?}",
                raw
            )));
        }

        let scaled = self.standardizer.transform(&raw);
        let prediction = self.intercept
            + scaled
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>();

        if !prediction.is_finite() {
            return Err(Error::Prediction(format!(
                "model produced non-finite value {}",
                prediction
            )));
        }
        Ok(prediction)
    }

    /// Coefficients labelled with their feature names
    pub fn weights(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
            .collect()
    }
}

/// Fit the model on a feature matrix and row-aligned targets
pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<FittedModel> {
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(Error::InsufficientData {
            needed: MIN_TRAINING_ROWS,
            got: rows.len(),
        });
    }
    if rows.len() != targets.len() {
        return Err(Error::InvalidReading(format!(
            "{} feature rows but {} targets",
            rows.len(),
            targets.len()
        )));
    }

    let raw: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(FeatureRow::to_array).collect();
    if raw.iter().flatten().chain(targets.iter()).any(|v| !v.is_finite()) {
        return Err(Error::InvalidReading(
            "training data contains non-finite values".into(),
        ));
    }

    let standardizer = Standardizer::fit(&raw);
    let n = raw.len();

    // Standardized columns have zero mean, so the intercept is the target mean
    // and the weights come from regressing the centered targets.
    let intercept = targets.iter().sum::<f64>() / n as f64;
    let x = DMatrix::from_fn(n, FEATURE_COUNT, |i, j| {
        (raw[i][j] - standardizer.means[j]) / standardizer.scales[j]
    });
    let y = DVector::from_iterator(n, targets.iter().map(|t| t - intercept));

    let svd = x.svd(true, true);
    let max_singular = svd.singular_values.max();
    let eps = max_singular * n.max(FEATURE_COUNT) as f64 * f64::EPSILON;
    let solution = svd
        .solve(&y, eps)
        .map_err(|e| Error::Prediction(format!("least squares solve failed: {}", e)))?;

    let mut coefficients = [0.0; FEATURE_COUNT];
    for (col, value) in solution.iter().enumerate() {
        coefficients[col] = *value;
    }

    let model = FittedModel {
        standardizer,
        coefficients,
        intercept,
    };
    debug!(
        rows = n,
        intercept,
        weights = ?model.weights(),
        "Fitted consumption model"
    );

    Ok(model)
}
