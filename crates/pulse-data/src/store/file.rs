//! CSV file storage.

use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use pulse_core::error::StorageError;
use pulse_core::traits::Storage;
use pulse_core::types::{ProcessedObservation, ProcessedSeries};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::validate_destination;

/// Stores each destination as `<dir>/<destination>.csv`.
///
/// Rows are written to a temporary file in the same directory and renamed
/// over the destination, so a reader sees the old file or the new one.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a destination.
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", destination))
    }

    fn tmp_path(&self, destination: &str) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}.{}.{}.tmp", destination, std::process::id(), n))
    }
}

fn write_series(tmp: &Path, target: &Path, series: &ProcessedSeries) -> Result<(), StorageError> {
    let result = (|| -> Result<(), StorageError> {
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_path(tmp)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        for obs in series.iter() {
            writer
                .serialize(obs)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
        }
        writer.flush()?;
        std::fs::rename(tmp, target)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(tmp);
    }
    result
}

fn read_series(path: &Path) -> Result<ProcessedSeries, StorageError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| StorageError::Io(e.to_string()))?;

    reader
        .deserialize::<ProcessedObservation>()
        .map(|r| r.map_err(|e| StorageError::Serialization(e.to_string())))
        .collect::<Result<Vec<_>, _>>()
        .map(ProcessedSeries::new)
}

fn join_error(e: tokio::task::JoinError) -> StorageError {
    StorageError::Io(format!("file task failed: {}", e))
}

#[async_trait]
impl Storage for FileStore {
    async fn upsert(
        &self,
        destination: &str,
        series: &ProcessedSeries,
    ) -> Result<usize, StorageError> {
        validate_destination(destination)?;

        let target = self.path_for(destination);
        let tmp = self.tmp_path(destination);
        let rows = series.len();
        let owned = series.clone();

        tokio::task::spawn_blocking(move || write_series(&tmp, &target, &owned))
            .await
            .map_err(join_error)??;

        debug!(destination, rows, "Wrote destination file");
        Ok(rows)
    }

    async fn read(&self, destination: &str) -> Result<ProcessedSeries, StorageError> {
        validate_destination(destination)?;

        let path = self.path_for(destination);
        if !path.exists() {
            return Err(StorageError::NotFound(destination.to_string()));
        }
        tokio::task::spawn_blocking(move || read_series(&path))
            .await
            .map_err(join_error)?
    }

    async fn destinations(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_destination(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let meta = tokio::fs::metadata(&self.dir).await?;
        if meta.permissions().readonly() {
            return Err(StorageError::Io(format!(
                "{} is read-only",
                self.dir.display()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(n: usize) -> ProcessedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.37;
                ProcessedObservation {
                    date: start + chrono::Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 12_345.0,
                    daily_return: (i > 0).then(|| 0.37 / (100.0 + (i - 1) as f64 * 0.37)),
                    sma_20: (i >= 19).then_some(close - 3.515),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_roundtrip_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let s = series(25);

        assert_eq!(store.upsert("stock_tcs_ns", &s).await.unwrap(), 25);
        assert_eq!(store.read("stock_tcs_ns").await.unwrap(), s);

        let text = std::fs::read_to_string(store.path_for("stock_tcs_ns")).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,open,high,low,close,volume,daily_return,sma_20")
        );
        // First row has neither metric.
        assert!(lines.next().unwrap().ends_with(",,"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.upsert("stock_a", &series(30)).await.unwrap();
        store.upsert("stock_a", &series(3)).await.unwrap();

        assert_eq!(store.read("stock_a").await.unwrap().len(), 3);
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_destinations_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("processed")).unwrap();

        store.upsert("stock_b", &series(1)).await.unwrap();
        store.upsert("stock_a", &series(1)).await.unwrap();
        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();

        assert_eq!(store.destinations().await.unwrap(), vec!["stock_a", "stock_b"]);
        assert!(matches!(
            store.read("stock_c").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_series_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.upsert("stock_empty", &ProcessedSeries::default()).await.unwrap(), 0);
        assert!(store.read("stock_empty").await.unwrap().is_empty());
    }
}
