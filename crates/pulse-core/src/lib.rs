//! Core types and traits for the price ingestion pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Price history types (RawSeries, ProcessedSeries)
//! - Instruments and destination naming
//! - Per-instrument outcomes
//! - Core traits for indicators, fetch adapters, and storage backends

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
