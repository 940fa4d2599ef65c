//! Pipeline engine.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use pulse_core::error::DataError;
use pulse_core::traits::{DataSource, Storage};
use pulse_core::types::{destination_name, file_stem, Outcome, OutcomeStatus, RawSeries};
use pulse_data::write_raw_csv;
use pulse_indicators::transform;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::report::PipelineRun;
use crate::retry::RetryPolicy;

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Calendar days of history requested per instrument
    pub lookback_days: u32,
    /// Retry policy for fetch calls
    pub fetch_retry: RetryPolicy,
    /// Retry policy for load calls
    pub load_retry: RetryPolicy,
    /// Archive each fetched raw series as `<raw_dir>/<stem>.csv`
    pub raw_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            fetch_retry: RetryPolicy::default(),
            load_retry: RetryPolicy::default(),
            raw_dir: None,
        }
    }
}

/// Fetch, transform and load driver.
pub struct Pipeline {
    config: PipelineConfig,
    source: Arc<dyn DataSource>,
    storage: Option<Arc<dyn Storage>>,
}

impl Pipeline {
    /// Create a new pipeline.
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn DataSource>,
        storage: Option<Arc<dyn Storage>>,
    ) -> Self {
        Self {
            config,
            source,
            storage,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process every symbol in order, one at a time.
    pub async fn run(&self, symbols: &[String], persist: bool) -> PipelineRun {
        let started_at = Utc::now();
        info!(
            instruments = symbols.len(),
            persist,
            source = self.source.name(),
            "Pipeline run started"
        );

        let mut outcomes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            outcomes.push(self.process(symbol, persist).await);
        }

        self.finish(started_at, persist, outcomes)
    }

    /// Process symbols with at most `workers` in flight.
    ///
    /// Outcomes are returned in input order. `workers <= 1` behaves like
    /// [`run`](Self::run).
    pub async fn run_concurrent(
        &self,
        symbols: &[String],
        persist: bool,
        workers: usize,
    ) -> PipelineRun {
        if workers <= 1 {
            return self.run(symbols, persist).await;
        }

        let started_at = Utc::now();
        info!(
            instruments = symbols.len(),
            persist,
            workers,
            source = self.source.name(),
            "Pipeline run started"
        );

        let mut indexed: Vec<(usize, Outcome)> = stream::iter(symbols.iter().enumerate())
            .map(|(i, symbol)| async move { (i, self.process(symbol, persist).await) })
            .buffer_unordered(workers)
            .collect()
            .await;
        indexed.sort_by_key(|(i, _)| *i);

        let outcomes = indexed.into_iter().map(|(_, o)| o).collect();
        self.finish(started_at, persist, outcomes)
    }

    fn finish(
        &self,
        started_at: chrono::DateTime<Utc>,
        persist: bool,
        outcomes: Vec<Outcome>,
    ) -> PipelineRun {
        let run = PipelineRun::new(started_at, persist, outcomes);
        info!(
            run_id = %run.run_id,
            attempted = run.stats.attempted,
            succeeded = run.stats.succeeded,
            failed = run.stats.failed,
            success_rate = run.stats.success_rate,
            duration_ms = run.duration_ms(),
            "Pipeline run finished"
        );
        run
    }

    /// One instrument's pass. Never fails; every fault becomes an outcome.
    async fn process(&self, symbol: &str, persist: bool) -> Outcome {
        let raw = match guarded(self.fetch(symbol)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return self.failed(symbol, OutcomeStatus::FetchFailed, e.to_string()),
            Err(panic) => return self.failed(symbol, OutcomeStatus::FetchFailed, panic),
        };
        debug!(symbol, rows = raw.len(), "Fetched");

        self.archive(&raw).await;

        let processed = match std::panic::catch_unwind(AssertUnwindSafe(|| transform(&raw))) {
            Ok(Ok(p)) => p,
            Ok(Err(e)) => {
                return self.failed(symbol, OutcomeStatus::TransformFailed, e.to_string())
            }
            Err(payload) => {
                return self.failed(
                    symbol,
                    OutcomeStatus::TransformFailed,
                    panic_message(payload.as_ref()),
                )
            }
        };
        let rows = processed.len();

        if !persist {
            info!(symbol, rows, "Processed (not persisted)");
            return Outcome::success(symbol, rows, None);
        }

        let Some(storage) = self.storage.as_deref() else {
            return self
                .failed(symbol, OutcomeStatus::LoadFailed, "no storage backend configured")
                .with_rows(rows);
        };

        let destination = destination_name(symbol);
        let load = self
            .config
            .load_retry
            .run(symbol, || storage.upsert(&destination, &processed));
        match guarded(load).await {
            Ok(Ok(written)) => {
                info!(symbol, destination = %destination, rows = written, "Loaded");
                Outcome::success(symbol, rows, Some(destination))
            }
            Ok(Err(e)) => self
                .failed(symbol, OutcomeStatus::LoadFailed, e.to_string())
                .with_rows(rows),
            Err(panic) => self
                .failed(symbol, OutcomeStatus::LoadFailed, panic)
                .with_rows(rows),
        }
    }

    async fn fetch(&self, symbol: &str) -> Result<RawSeries, DataError> {
        let lookback = self.config.lookback_days;
        self.config
            .fetch_retry
            .run(symbol, || self.source.fetch(symbol, lookback))
            .await
    }

    async fn archive(&self, raw: &RawSeries) {
        let Some(dir) = &self.config.raw_dir else {
            return;
        };
        let path = dir.join(format!("{}.csv", file_stem(&raw.symbol)));
        let target = path.clone();
        let owned = raw.clone();

        let result = tokio::task::spawn_blocking(move || write_raw_csv(&target, &owned))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!(symbol = %raw.symbol, path = %path.display(), error = %e, "Raw archive failed");
        }
    }

    fn failed(&self, symbol: &str, status: OutcomeStatus, detail: impl Into<String>) -> Outcome {
        let detail = detail.into();
        warn!(symbol, %status, detail = %detail, "Instrument failed");
        Outcome::failed(symbol, status, detail)
    }
}

/// Run a future, turning a panic into an error message.
async fn guarded<F: Future>(fut: F) -> Result<F::Output, String> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("panic: {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "panic: boom");

        let owned = std::panic::catch_unwind(|| panic!("{} {}", "owned", 1)).unwrap_err();
        assert_eq!(panic_message(owned.as_ref()), "panic: owned 1");
    }

    #[tokio::test]
    async fn test_guarded_catches_async_panic() {
        let result: Result<(), String> = guarded(async { panic!("adapter exploded") }).await;
        assert_eq!(result.unwrap_err(), "panic: adapter exploded");

        assert_eq!(guarded(async { 7 }).await, Ok(7));
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.lookback_days, 60);
        assert_eq!(config.fetch_retry.max_attempts, 1);
        assert!(config.raw_dir.is_none());
    }
}
