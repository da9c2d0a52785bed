//! Trend Analyzer
//!
//! Descriptive statistics over the full historical series:
//! - Overall daily average and the peak day
//! - Mean consumption per day of week and per calendar month
//! - Weekday vs weekend averages
//! - Linear trend slope across the observation window

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{validate_readings, Reading, Trends};
use crate::stats;

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Mean consumption per month-end bucket, covering every month between the
/// first and last reading. Months without readings map to `None`.
fn monthly_means(readings: &[Reading]) -> BTreeMap<NaiveDate, Option<f64>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        buckets
            .entry(month_end(reading.date))
            .or_default()
            .push(reading.consumption);
    }

    let mut result = BTreeMap::new();
    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return result;
    };

    let mut bucket = first;
    while bucket <= last {
        let value = buckets.get(&bucket).and_then(|values| stats::mean(values));
        result.insert(bucket, value);
        bucket = match bucket.succ_opt() {
            Some(next) => month_end(next),
            None => break,
        };
    }
    result
}

/// Analyze the historical series
pub fn analyze_trends(readings: &[Reading]) -> Result<Trends> {
    if readings.is_empty() {
        return Err(Error::EmptyDataset);
    }
    validate_readings(readings)?;

    let values: Vec<f64> = readings.iter().map(|r| r.consumption).collect();
    let daily_average = stats::mean(&values).ok_or(Error::EmptyDataset)?;

    // First occurrence wins on ties
    let mut peak = readings[0];
    for reading in &readings[1..] {
        if reading.consumption > peak.consumption {
            peak = *reading;
        }
    }

    let mut by_weekday: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut weekday_values = Vec::new();
    let mut weekend_values = Vec::new();
    for reading in readings {
        let dow = reading.date.weekday().num_days_from_monday();
        by_weekday.entry(dow).or_default().push(reading.consumption);
        if dow < 5 {
            weekday_values.push(reading.consumption);
        } else {
            weekend_values.push(reading.consumption);
        }
    }

    let weekly_pattern: BTreeMap<u32, f64> = by_weekday
        .iter()
        .filter_map(|(dow, values)| stats::mean(values).map(|m| (*dow, m)))
        .collect();

    let trends = Trends {
        daily_average,
        peak_usage: peak.consumption,
        peak_time: peak.date.and_time(chrono::NaiveTime::MIN),
        weekly_pattern,
        monthly_trend: monthly_means(readings),
        weekday_average: stats::mean(&weekday_values),
        weekend_average: stats::mean(&weekend_values),
        consumption_trend: stats::index_slope(&values),
    };

    debug!(
        readings = readings.len(),
        daily_average = trends.daily_average,
        peak_usage = trends.peak_usage,
        consumption_trend = trends.consumption_trend,
        "Analyzed consumption trends"
    );
    Ok(trends)
}
