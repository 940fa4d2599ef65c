//! Daily price history types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day as returned by a fetch adapter.
///
/// Any numeric field may be missing; a `NaN` is treated the same as a
/// missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: Option<f64>,
    /// Highest price
    pub high: Option<f64>,
    /// Lowest price
    pub low: Option<f64>,
    /// Closing price
    pub close: Option<f64>,
    /// Trading volume
    pub volume: Option<f64>,
}

impl RawObservation {
    /// Create a fully populated observation.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Check that every field carries a value.
    #[inline]
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| matches!(v, Some(x) if !x.is_nan()))
    }
}

/// Chronological price history for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    /// Symbol identifier
    pub symbol: String,
    observations: Vec<RawObservation>,
}

impl RawSeries {
    /// Wrap observations as delivered by a provider.
    ///
    /// The caller is responsible for date ordering; use
    /// [`RawSeries::from_unsorted`] when the source gives no guarantee.
    pub fn new(symbol: impl Into<String>, observations: Vec<RawObservation>) -> Self {
        Self {
            symbol: symbol.into(),
            observations,
        }
    }

    /// Sort by date and keep the last observation for a repeated date.
    pub fn from_unsorted(symbol: impl Into<String>, mut observations: Vec<RawObservation>) -> Self {
        observations.sort_by_key(|o| o.date);
        let mut deduped: Vec<RawObservation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }
        Self::new(symbol, deduped)
    }

    /// Get the number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get all observations as a slice.
    pub fn observations(&self) -> &[RawObservation] {
        &self.observations
    }

    /// Get an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &RawObservation> {
        self.observations.iter()
    }
}

/// A complete observation with derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessedObservation {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// `close / previous close - 1`, undefined for the first row
    pub daily_return: Option<f64>,
    /// Trailing 20-observation mean close, undefined for the first 19 rows
    pub sma_20: Option<f64>,
}

/// Output of the transform: one row per surviving raw observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSeries {
    observations: Vec<ProcessedObservation>,
}

impl ProcessedSeries {
    pub fn new(observations: Vec<ProcessedObservation>) -> Self {
        Self { observations }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[ProcessedObservation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessedObservation> {
        self.observations.iter()
    }

    /// Get an observation by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&ProcessedObservation> {
        self.observations.get(index)
    }

    /// Get the last N observations, oldest first.
    pub fn last_n(&self, n: usize) -> &[ProcessedObservation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }
}

impl FromIterator<ProcessedObservation> for ProcessedSeries {
    fn from_iter<T: IntoIterator<Item = ProcessedObservation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
