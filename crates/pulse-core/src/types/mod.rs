//! Core data types for the pipeline.

mod instrument;
mod outcome;
mod series;

pub use instrument::{destination_name, file_stem, Instrument};
pub use outcome::{Outcome, OutcomeStatus};
pub use series::{ProcessedObservation, ProcessedSeries, RawObservation, RawSeries};
