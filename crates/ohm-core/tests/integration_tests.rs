//! Integration tests for ohm-core
//!
//! These tests exercise the full import → analyze → forecast workflow.

use chrono::{Datelike, Duration, NaiveDate};
use ohm_core::{
    analyze_consumption, build_dashboard, build_features, fit, forecast, parse_readings,
    Error, ImportConfig, Reading, FORECAST_HORIZON,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Helper to create a meter export with weekly seasonality:
/// - 8 weeks of daily readings starting Monday 2024-01-01
/// - weekdays around 11 kWh, weekends around 19 kWh
/// - a gentle upward drift
fn meter_csv() -> String {
    let mut csv = String::from("Date,Usage\n");
    let start = date(2024, 1, 1);
    for i in 0..56 {
        let day = start + Duration::days(i);
        let base = if day.weekday().num_days_from_monday() >= 5 {
            19.0
        } else {
            11.0
        };
        let usage = base + i as f64 * 0.02 + ((i * 5) % 3) as f64 * 0.4;
        csv.push_str(&format!("{},{:.2}\n", day.format("%Y-%m-%d"), usage));
    }
    csv
}

fn simple_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sx: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sy: f64 = values.iter().sum();
    let sxy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let sxx: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();
    (n * sxy - sx * sy) / (n * sxx - sx * sx)
}

// =============================================================================
// Pipeline Integration Tests
// =============================================================================

#[test]
fn test_full_analysis_workflow() {
    let readings = parse_readings(meter_csv().as_bytes(), &ImportConfig::default())
        .expect("Failed to parse CSV");
    assert_eq!(readings.len(), 56);

    let report = analyze_consumption(&readings, date(2024, 12, 10)).expect("Analysis failed");

    // Trends
    assert_eq!(report.trends.weekly_pattern.len(), 7);
    assert!(report.trends.weekend_average.unwrap() > report.trends.weekday_average.unwrap());
    assert!(report.trends.consumption_trend > 0.0);

    // Suggestions: weekend skew, rising trend, moderate level, winter
    assert!(report.suggestions.iter().any(|s| s.starts_with("Weekend consumption")));
    assert!(report.suggestions.iter().any(|s| s.contains("increasing trend")));
    assert!(report.suggestions.iter().any(|s| s.contains("moderate")));
    assert!(report.suggestions.last().unwrap().starts_with("Winter"));

    // Forecast
    let last = readings.last().unwrap().date;
    assert_eq!(report.predictions.len(), FORECAST_HORIZON);
    for (i, point) in report.predictions.iter().enumerate() {
        assert_eq!(point.date, last + Duration::days(i as i64 + 1));
        assert!(point.predicted_consumption.is_finite());
    }

    // Savings
    assert_eq!(report.savings_predictions.len(), FORECAST_HORIZON);
    for (s, p) in report
        .savings_predictions
        .iter()
        .zip(report.predictions.iter())
    {
        assert_eq!(s.date, p.date);
        assert_eq!(s.predicted_consumption, p.predicted_consumption);
        let v = p.predicted_consumption.abs();
        assert!(s.savings_prediction.abs() >= 0.70 * v - 1e-12);
        assert!(s.savings_prediction.abs() <= 0.95 * v + 1e-12);
    }
}

#[test]
fn test_report_serializes_to_expected_shape() {
    let readings = parse_readings(meter_csv().as_bytes(), &ImportConfig::default()).unwrap();
    let report = analyze_consumption(&readings, date(2024, 6, 1)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["trends"]["daily_average"].is_number());
    assert_eq!(json["trends"]["peak_time"].as_str().unwrap().len(), 16);
    assert!(json["trends"]["monthly_trend"]["2024-01-31"].is_number());
    assert_eq!(json["predictions"].as_array().unwrap().len(), 30);
    assert_eq!(json["predictions"][0]["date"], "2024-02-26");
    assert!(json["savings_predictions"][0]["savings_prediction"].is_number());
}

#[test]
fn test_trend_sign_matches_simple_regression() {
    let readings = parse_readings(meter_csv().as_bytes(), &ImportConfig::default()).unwrap();
    let values: Vec<f64> = readings.iter().map(|r| r.consumption).collect();
    let report = analyze_consumption(&readings, date(2024, 6, 1)).unwrap();

    let external = simple_slope(&values);
    assert_eq!(report.trends.consumption_trend > 0.0, external > 0.0);
    assert!((report.trends.consumption_trend - external).abs() < 1e-9);
}

#[test]
fn test_constant_series_scenario() {
    let start = date(2024, 4, 1);
    let readings: Vec<Reading> = (0..30)
        .map(|i| Reading::new(start + Duration::days(i), 15.0))
        .collect();

    let report = analyze_consumption(&readings, date(2024, 4, 15)).unwrap();
    assert_eq!(report.trends.daily_average, 15.0);
    assert!(report.trends.consumption_trend.abs() < 1e-9);
    assert_eq!(report.trends.weekly_pattern.len(), 7);
    assert!(report
        .predictions
        .iter()
        .all(|p| (p.predicted_consumption - 15.0).abs() < 1e-9));
}

#[test]
fn test_spike_scenario() {
    let start = date(2024, 8, 1);
    let readings: Vec<Reading> = (0..25)
        .map(|i| {
            let value = if i == 17 { 200.0 } else { 10.0 };
            Reading::new(start + Duration::days(i), value)
        })
        .collect();

    let report = analyze_consumption(&readings, date(2024, 9, 1)).unwrap();
    assert_eq!(report.trends.peak_usage, 200.0);
    assert_eq!(report.trends.peak_time.date(), date(2024, 8, 18));
}

#[test]
fn test_minimum_row_scenarios() {
    let start = date(2024, 1, 1);
    let make = |n: i64| -> Vec<Reading> {
        (0..n)
            .map(|i| Reading::new(start + Duration::days(i), 5.0 + (i % 4) as f64))
            .collect()
    };

    // 10 readings: three feature rows, enough to fit and forecast
    let ten = make(10);
    let features = build_features(&ten);
    assert_eq!(features.len(), 3);
    let model = fit(&features.rows, &features.targets).unwrap();
    let points = forecast(&model, &features).unwrap();
    assert_eq!(points.len(), 30);

    // 7 readings: no feature rows, fit reports insufficient data
    let seven = make(7);
    let features = build_features(&seven);
    assert_eq!(features.len(), 0);
    assert!(matches!(
        fit(&features.rows, &features.targets),
        Err(Error::InsufficientData { .. })
    ));
}

#[test]
fn test_failure_returns_no_partial_results() {
    let csv = "Date,Usage\n2024-01-01,1.0\n2024-01-02,2.0\n2024-01-03,3.0\n";
    let readings = parse_readings(csv.as_bytes(), &ImportConfig::default()).unwrap();

    // Trend analysis alone would succeed, but the bundle needs a forecast
    assert!(ohm_core::analyze_trends(&readings).is_ok());
    assert!(matches!(
        analyze_consumption(&readings, date(2024, 1, 4)),
        Err(Error::InsufficientData { .. })
    ));
}

#[test]
fn test_dashboard_payload() {
    let readings = parse_readings(meter_csv().as_bytes(), &ImportConfig::default()).unwrap();
    let dashboard = build_dashboard(&readings, date(2024, 3, 1)).unwrap();
    let json = serde_json::to_value(&dashboard).unwrap();

    assert_eq!(json["message"], "Dashboard data retrieved successfully");
    assert_eq!(json["data"].as_array().unwrap().len(), 56);
    assert_eq!(json["data"][0]["date"], "2024-01-01");
    assert!(json["analysis"]["suggestions"].is_array());

    let empty = build_dashboard(&[], date(2024, 3, 1)).unwrap();
    assert_eq!(empty.message, "No data available");
}
