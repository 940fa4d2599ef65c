//! Run statistics.

use pulse_core::types::{Outcome, OutcomeStatus};
use serde::{Deserialize, Serialize};

/// Aggregate counts over a run's outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Instruments attempted (one per outcome)
    pub attempted: usize,
    /// Instruments that completed every stage
    pub succeeded: usize,
    /// Instruments that failed at any stage
    pub failed: usize,
    /// succeeded / attempted × 100, rounded to two decimals; 0 for an empty run
    pub success_rate: f64,
    pub fetch_failed: usize,
    pub transform_failed: usize,
    pub load_failed: usize,
    /// Processed rows across successful instruments
    pub rows_processed: usize,
}

impl RunStats {
    /// Calculate statistics from outcomes.
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut stats = Self {
            attempted: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Success => {
                    stats.succeeded += 1;
                    stats.rows_processed += outcome.rows;
                }
                OutcomeStatus::FetchFailed => stats.fetch_failed += 1,
                OutcomeStatus::TransformFailed => stats.transform_failed += 1,
                OutcomeStatus::LoadFailed => stats.load_failed += 1,
            }
        }
        stats.failed = stats.attempted - stats.succeeded;
        stats.success_rate = success_rate(stats.succeeded, stats.attempted);
        stats
    }
}

fn success_rate(succeeded: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    let pct = succeeded as f64 / attempted as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}
