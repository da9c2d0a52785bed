//! CSV import for meter reading exports
//!
//! Accepts a header row plus one reading per line. The date and consumption
//! columns are found by header name (see [`ImportConfig`]), so both the
//! `Date,Usage` export layout and plain `date,consumption` files load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::config::ImportConfig;
use crate::error::{Error, Result};
use crate::models::Reading;

/// Load readings from a CSV file on disk
pub fn load_readings(path: &Path, config: &ImportConfig) -> Result<Vec<Reading>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(Error::Import("Only CSV files are allowed".into()));
    }

    let file = File::open(path)?;
    parse_readings(file, config)
}

/// Find the first header matching one of `aliases`
fn find_column(headers: &StringRecord, aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h.trim() == alias))
}

/// Parse CSV data into readings sorted by date
pub fn parse_readings<R: Read>(reader: R, config: &ImportConfig) -> Result<Vec<Reading>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::Import("The file is empty".into()));
    }

    let date_col = find_column(&headers, &config.date_columns);
    let consumption_col = find_column(&headers, &config.consumption_columns);
    let (date_col, consumption_col) = match (date_col, consumption_col) {
        (Some(d), Some(c)) => (d, c),
        (d, c) => {
            let mut missing = Vec::new();
            if d.is_none() {
                missing.push(config.date_columns.join("/"));
            }
            if c.is_none() {
                missing.push(config.consumption_columns.join("/"));
            }
            return Err(Error::Import(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }
    };

    let mut readings = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let date_str = record
            .get(date_col)
            .ok_or_else(|| Error::InvalidReading("Missing date".into()))?;
        let date = parse_date(date_str)?;

        let consumption_str = record
            .get(consumption_col)
            .ok_or_else(|| Error::InvalidReading(format!("Missing consumption on {}", date)))?;
        let consumption = parse_consumption(consumption_str)?;

        readings.push(Reading::new(date, consumption));
    }

    // Stable sort keeps file order for repeated dates
    readings.sort_by_key(|r| r.date);

    debug!("Parsed {} readings", readings.len());
    Ok(readings)
}

/// Parse a date string in one of several common formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%d.%m.%Y", // 15.01.2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Timestamped exports: keep the calendar day
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(Error::InvalidReading(format!("Unable to parse date: {:?}", s)))
}

/// Parse a consumption value, tolerating thousands separators and units
fn parse_consumption(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .trim_end_matches("kWh")
        .replace([',', ' '], "");

    let value = cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidReading(format!("Invalid consumption value: {:?}", s)))?;
    if !value.is_finite() {
        return Err(Error::InvalidReading(format!(
            "Invalid consumption value: {:?}",
            s
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ImportConfig {
        ImportConfig::default()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("01/15/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("2024-01-15 13:45:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_consumption() {
        assert_eq!(parse_consumption("12.5").unwrap(), 12.5);
        assert_eq!(parse_consumption(" 1,234.5 ").unwrap(), 1234.5);
        assert_eq!(parse_consumption("7.25kWh").unwrap(), 7.25);
        assert!(matches!(
            parse_consumption("n/a"),
            Err(Error::InvalidReading(_))
        ));
        assert!(parse_consumption("").is_err());
        assert!(parse_consumption("NaN").is_err());
    }

    #[test]
    fn test_parse_usage_layout() {
        let csv = "Date,Usage\n2024-01-02,11.0\n2024-01-01,10.5\n";
        let readings = parse_readings(csv.as_bytes(), &config()).unwrap();

        assert_eq!(readings.len(), 2);
        // Sorted by date
        assert_eq!(readings[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(readings[0].consumption, 10.5);
        assert_eq!(readings[1].consumption, 11.0);
    }

    #[test]
    fn test_parse_consumption_layout_with_extra_columns() {
        let csv = "meter,date,consumption\nA1,2024-03-01,4.0\nA1,2024-03-02,5.0\n";
        let readings = parse_readings(csv.as_bytes(), &config()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].consumption, 5.0);
    }

    #[test]
    fn test_missing_columns() {
        let csv = "Day,Usage\n2024-01-01,1.0\n";
        let err = parse_readings(csv.as_bytes(), &config()).unwrap_err();
        assert!(err.to_string().contains("Missing required columns: Date/date"));

        let csv = "Date,Amount\n2024-01-01,1.0\n";
        let err = parse_readings(csv.as_bytes(), &config()).unwrap_err();
        assert!(err.to_string().contains("Usage/consumption"));
    }

    #[test]
    fn test_empty_file() {
        let err = parse_readings("".as_bytes(), &config()).unwrap_err();
        assert!(err.to_string().contains("The file is empty"));
    }

    #[test]
    fn test_invalid_consumption_rejects_file() {
        let csv = "Date,Usage\n2024-01-01,1.0\n2024-01-02,abc\n";
        assert!(matches!(
            parse_readings(csv.as_bytes(), &config()),
            Err(Error::InvalidReading(_))
        ));
    }

    #[test]
    fn test_bad_dates_reject_file() {
        for csv in [
            "Date,Usage\n,5.0\n",
            "Date,Usage\n2024-01-01,1.0\nnot-a-date,5.0\n",
            "Usage,Date\n5.0\n",
        ] {
            assert!(
                matches!(
                    parse_readings(csv.as_bytes(), &config()),
                    Err(Error::InvalidReading(_))
                ),
                "expected InvalidReading for {:?}",
                csv
            );
        }
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "Date,Usage\n2024-01-01,1.0\n,\n2024-01-02,2.0\n";
        let readings = parse_readings(csv.as_bytes(), &config()).unwrap();
        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn test_load_rejects_non_csv() {
        let err = load_readings(Path::new("readings.xlsx"), &config()).unwrap_err();
        assert!(err.to_string().contains("Only CSV files are allowed"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.csv");
        std::fs::write(&path, "Date,Usage\n2024-01-01,3.5\n").unwrap();

        let readings = load_readings(&path, &config()).unwrap();
        assert_eq!(readings, vec![Reading::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            3.5
        )]);
    }
}
