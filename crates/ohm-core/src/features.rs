//! Feature Builder
//!
//! Turns an ordered reading series into the supervised-learning matrix used
//! by the consumption model: calendar features of each day plus lag and
//! 7-day rolling-window features of the series. Rows whose lag or window
//! cannot be fully populated (the first 7 readings) are dropped.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::models::{FeatureRow, Reading};
use crate::stats;

/// Size of the lag/rolling window, in days
pub const WINDOW: usize = 7;

/// Minimum readings needed to produce at least one feature row
pub const MIN_READINGS: usize = WINDOW + 1;

/// Calendar part of a feature row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    pub dayofweek: u32,
    pub month: u32,
    pub day: u32,
    pub isoweek: u32,
}

impl CalendarFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            dayofweek: date.weekday().num_days_from_monday(),
            month: date.month(),
            day: date.day(),
            isoweek: date.iso_week().week(),
        }
    }
}

/// Lag and rolling-window part of a feature row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagFeatures {
    pub lag1: f64,
    pub lag7: f64,
    pub rolling_mean_7: f64,
    pub rolling_std_7: f64,
}

/// Assemble a full feature row
pub fn feature_row(calendar: CalendarFeatures, lags: LagFeatures) -> FeatureRow {
    FeatureRow {
        dayofweek: calendar.dayofweek,
        month: calendar.month,
        day: calendar.day,
        isoweek: calendar.isoweek,
        lag1: lags.lag1,
        lag7: lags.lag7,
        rolling_mean_7: lags.rolling_mean_7,
        rolling_std_7: lags.rolling_std_7,
    }
}

/// Training matrix plus the state needed to seed forecasting
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    /// Complete feature rows, oldest first
    pub rows: Vec<FeatureRow>,
    /// Consumption on the day of each row
    pub targets: Vec<f64>,
    /// Date of each row
    pub dates: Vec<NaiveDate>,
    /// Last raw consumption values (up to `WINDOW`), oldest first
    pub recent: Vec<f64>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The most recent complete row, if any
    pub fn last_row(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    /// Date of the most recent complete row, which is the last reading's date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Build the feature matrix for an ordered reading series.
///
/// Produces `len - 7` rows for 8 or more readings and an empty matrix
/// otherwise; too few rows is left for the model fit to reject.
pub fn build_features(readings: &[Reading]) -> FeatureMatrix {
    let values: Vec<f64> = readings.iter().map(|r| r.consumption).collect();
    let mut matrix = FeatureMatrix {
        recent: values[values.len().saturating_sub(WINDOW)..].to_vec(),
        ..Default::default()
    };

    for i in WINDOW..readings.len() {
        let window = &values[i + 1 - WINDOW..=i];
        // Window is always full here, so both statistics are defined
        let (Some(rolling_mean_7), Some(rolling_std_7)) =
            (stats::mean(window), stats::sample_std(window))
        else {
            continue;
        };

        let lags = LagFeatures {
            lag1: values[i - 1],
            lag7: values[i - WINDOW],
            rolling_mean_7,
            rolling_std_7,
        };
        let calendar = CalendarFeatures::from_date(readings[i].date);

        matrix.rows.push(feature_row(calendar, lags));
        matrix.targets.push(values[i]);
        matrix.dates.push(readings[i].date);
    }

    debug!(
        readings = readings.len(),
        rows = matrix.rows.len(),
        "Built feature matrix"
    );
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn series(values: &[f64]) -> Vec<Reading> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Reading::new(start + Duration::days(i as i64), *v))
            .collect()
    }

    #[test]
    fn test_calendar_features() {
        // 2024-01-01 is a Monday in ISO week 1
        let cal = CalendarFeatures::from_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(cal.dayofweek, 0);
        assert_eq!(cal.month, 1);
        assert_eq!(cal.day, 1);
        assert_eq!(cal.isoweek, 1);

        // 2023-01-01 is a Sunday belonging to ISO week 52 of 2022
        let cal = CalendarFeatures::from_date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(cal.dayofweek, 6);
        assert_eq!(cal.isoweek, 52);
    }

    #[test]
    fn test_row_count_is_len_minus_window() {
        for len in [8usize, 10, 30, 61] {
            let values: Vec<f64> = (0..len).map(|i| i as f64).collect();
            let matrix = build_features(&series(&values));
            assert_eq!(matrix.len(), len - 7);
            assert_eq!(matrix.targets.len(), len - 7);
            assert_eq!(matrix.dates.len(), len - 7);
        }
    }

    #[test]
    fn test_ten_readings_yield_three_rows() {
        let values: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let matrix = build_features(&series(&values));
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_seven_readings_yield_no_rows() {
        let matrix = build_features(&series(&[1.0; 7]));
        assert!(matrix.is_empty());
        assert!(matrix.last_row().is_none());
        assert_eq!(matrix.recent.len(), 7);
    }

    #[test]
    fn test_lag_and_rolling_values() {
        let values: Vec<f64> = (1..=9).map(|i| i as f64).collect();
        let readings = series(&values);
        let matrix = build_features(&readings);

        // First row corresponds to index 7 (value 8.0)
        let first = matrix.rows[0];
        assert_eq!(matrix.targets[0], 8.0);
        assert_eq!(matrix.dates[0], readings[7].date);
        assert_eq!(first.lag1, 7.0);
        assert_eq!(first.lag7, 1.0);
        // Window is 2..=8
        assert!((first.rolling_mean_7 - 5.0).abs() < 1e-12);
        // Sample std of 7 consecutive integers is sqrt(28/6)
        assert!((first.rolling_std_7 - (28.0f64 / 6.0).sqrt()).abs() < 1e-12);

        assert_eq!(matrix.recent, vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(matrix.last_row().unwrap().lag1, 8.0);
    }
}
