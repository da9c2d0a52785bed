//! Consumption analysis pipeline
//!
//! Runs every stage over one reading series and returns the complete
//! report, or the first error. Nothing is cached between calls: each run
//! builds its own feature matrix and fitted model.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};
use crate::features::{build_features, MIN_READINGS};
use crate::forecast::forecast;
use crate::models::{AnalysisReport, Dashboard, Reading};
use crate::regression;
use crate::savings::estimate_savings;
use crate::suggestions::generate_suggestions;
use crate::trends::analyze_trends;

/// Analyze a reading series, using `today` for date-dependent suggestions
pub fn analyze_consumption(readings: &[Reading], today: NaiveDate) -> Result<AnalysisReport> {
    if readings.is_empty() {
        return Err(Error::EmptyDataset);
    }

    // analyze_trends validates the readings for every later stage
    let trends = analyze_trends(readings)?;
    let suggestions = generate_suggestions(&trends, today);

    let features = build_features(readings);
    if features.is_empty() {
        return Err(Error::InsufficientData {
            needed: MIN_READINGS,
            got: readings.len(),
        });
    }
    let model = regression::fit(&features.rows, &features.targets)?;

    let predictions = forecast(&model, &features)?;
    let savings_predictions = estimate_savings(&predictions);

    info!(
        readings = readings.len(),
        suggestions = suggestions.len(),
        forecast_days = predictions.len(),
        "Consumption analysis complete"
    );

    Ok(AnalysisReport {
        trends,
        suggestions,
        predictions,
        savings_predictions,
    })
}

/// Analyze a reading series as of the local calendar date
pub fn analyze_consumption_now(readings: &[Reading]) -> Result<AnalysisReport> {
    analyze_consumption(readings, chrono::Local::now().date_naive())
}

/// Build the dashboard payload: the raw readings with their analysis.
///
/// An empty series is not an error here; it yields a payload without data.
pub fn build_dashboard(readings: &[Reading], today: NaiveDate) -> Result<Dashboard> {
    if readings.is_empty() {
        return Ok(Dashboard {
            message: "No data available".to_string(),
            data: None,
            analysis: None,
        });
    }

    let analysis = analyze_consumption(readings, today)?;
    Ok(Dashboard {
        message: "Dashboard data retrieved successfully".to_string(),
        data: Some(readings.to_vec()),
        analysis: Some(analysis),
    })
}
