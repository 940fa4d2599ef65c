//! CSV data source and raw series archive.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use pulse_core::error::DataError;
use pulse_core::traits::DataSource;
use pulse_core::types::{file_stem, RawObservation, RawSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::yahoo::adjust_to_close;

/// CSV record format.
///
/// Accepts both the archive's own header and the capitalised headers most
/// download tools produce. An `Adj Close` column, when present, rescales the
/// row the same way the Yahoo source does.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close", default)]
    close: Option<f64>,
    #[serde(rename = "Adj Close", alias = "adj_close", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

/// Read a raw series from a CSV file.
pub fn read_raw_csv(path: &Path, symbol: &str) -> Result<RawSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut observations = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut obs = RawObservation {
            date: parse_date(&record.date)?,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        };
        adjust_to_close(&mut obs, record.adj_close);
        observations.push(obs);
    }

    Ok(RawSeries::from_unsorted(symbol, observations))
}

/// Write a raw series as `date,open,high,low,close,volume`, missing values empty.
pub fn write_raw_csv(path: &Path, series: &RawSeries) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for obs in series.iter() {
        writer.serialize(obs)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_str = date_str.trim();

    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%:z"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Ok(dt.date_naive());
        }
    }

    // Try parsing as Unix timestamp
    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = dt {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

/// Offline data source reading `<dir>/<stem>.csv` files.
///
/// The lookback window is ignored; the whole file is returned.
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source over a directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Internal(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Path holding a symbol's raw history.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", file_stem(symbol)))
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch(&self, symbol: &str, _lookback_days: u32) -> Result<RawSeries, DataError> {
        let path = self.path_for(symbol);
        let read_path = path.clone();
        let owned = symbol.to_string();

        let series = tokio::task::spawn_blocking(move || {
            if !read_path.exists() {
                return Err(DataError::SymbolNotFound(owned));
            }
            read_raw_csv(&read_path, &owned)
        })
        .await
        .map_err(|e| DataError::Internal(format!("CSV reader task failed: {}", e)))??;

        if series.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        debug!(symbol, rows = series.len(), path = %path.display(), "Read raw CSV");
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 00:00:00").unwrap(), expected);
        assert_eq!(parse_date("1705312800000").unwrap(), expected); // Unix ms
        assert_eq!(parse_date("1705312800").unwrap(), expected); // Unix sec
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_reads_download_tool_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TCS_NS.csv");
        std::fs::write(
            &path,
            "Date,Close,High,Low,Open,Volume\n\
             2024-01-03,101.0,102.0,100.0,100.5,2000\n\
             2024-01-02,100.0,101.0,99.0,99.5,1000\n\
             2024-01-04,,103.0,101.0,101.5,3000\n",
        )
        .unwrap();

        let series = read_raw_csv(&path, "TCS.NS").unwrap();
        let obs = series.observations();

        assert_eq!(series.symbol, "TCS.NS");
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(obs[0].open, Some(99.5));
        assert_eq!(obs[2].close, None);
        assert!(!obs[2].is_complete());
    }

    #[test]
    fn test_reads_yahoo_export_with_adjusted_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TCS_NS.csv");
        std::fs::write(
            &path,
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02,99.5,101.0,99.0,100.0,98.0,1000\n\
             2024-01-03,100.0,102.0,99.5,101.0,,2000\n",
        )
        .unwrap();

        let series = read_raw_csv(&path, "TCS.NS").unwrap();
        let obs = series.observations();

        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].close, Some(98.0));
        assert!((obs[0].open.unwrap() - 99.5 * 0.98).abs() < 1e-9);
        assert!((obs[0].high.unwrap() - 101.0 * 0.98).abs() < 1e-9);
        assert_eq!(obs[0].volume, Some(1000.0));
        // No adjusted value: prices kept as reported
        assert_eq!(obs[1].close, Some(101.0));
        assert_eq!(obs[1].open, Some(100.0));
    }

    #[tokio::test]
    async fn test_archive_and_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut partial = RawObservation::new(date.succ_opt().unwrap(), 1.0, 2.0, 0.5, 1.5, 10.0);
        partial.high = None;
        let series = RawSeries::new(
            "M&M.NS",
            vec![RawObservation::new(date, 1.0, 2.0, 0.5, 1.5, 10.0), partial],
        );

        let source = CsvDataSource::new(dir.path()).unwrap();
        write_raw_csv(&source.path_for("M&M.NS"), &series).unwrap();

        let text = std::fs::read_to_string(dir.path().join("M_M_NS.csv")).unwrap();
        assert!(text.starts_with("date,open,high,low,close,volume\n"));
        assert!(text.contains("2024-01-03,1.0,,0.5,1.5,10.0"));

        let fetched = source.fetch("M&M.NS", 60).await.unwrap();
        assert_eq!(fetched, series);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDataSource::new(dir.path()).unwrap();

        let err = source.fetch("NOPE.NS", 60).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(CsvDataSource::new(dir.path().join("missing")).is_err());
    }
}
