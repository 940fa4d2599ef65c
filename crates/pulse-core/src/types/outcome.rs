//! Per-instrument run outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an instrument's pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    FetchFailed,
    TransformFailed,
    LoadFailed,
}

impl OutcomeStatus {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::FetchFailed => "fetch_failed",
            OutcomeStatus::TransformFailed => "transform_failed",
            OutcomeStatus::LoadFailed => "load_failed",
        };
        f.write_str(s)
    }
}

/// Result of one instrument's fetch, transform and load pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub symbol: String,
    pub status: OutcomeStatus,
    /// Error detail for failed passes
    pub detail: Option<String>,
    /// Processed rows produced (0 unless the transform ran)
    pub rows: usize,
    /// Destination written, if the load step ran and succeeded
    pub destination: Option<String>,
}

impl Outcome {
    /// A completed pass.
    pub fn success(symbol: impl Into<String>, rows: usize, destination: Option<String>) -> Self {
        Self {
            symbol: symbol.into(),
            status: OutcomeStatus::Success,
            detail: None,
            rows,
            destination,
        }
    }

    /// A pass that stopped at `status`.
    pub fn failed(
        symbol: impl Into<String>,
        status: OutcomeStatus,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            status,
            detail: Some(detail.into()),
            rows: 0,
            destination: None,
        }
    }

    /// Record how many rows the transform produced before a later failure.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
