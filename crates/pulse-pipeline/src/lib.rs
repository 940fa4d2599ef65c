//! Pipeline orchestration.
//!
//! [`Pipeline`] drives fetch, transform and load for each instrument of a
//! work list, isolating failures so one instrument never stops the others,
//! and returns a [`PipelineRun`] describing every outcome.

mod engine;
mod report;
mod retry;
mod statistics;

pub use engine::{Pipeline, PipelineConfig};
pub use report::PipelineRun;
pub use retry::{RetryPolicy, Retryable};
pub use statistics::RunStats;
