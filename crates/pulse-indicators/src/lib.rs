//! Derived price metrics.
//!
//! This crate provides the indicators the pipeline attaches to every daily
//! observation and the [`transform`] that applies them:
//! - Simple moving average over closes ([`Sma`])
//! - Close-to-close relative change ([`DailyReturn`])
//!
//! The transform is pure: it never performs I/O and identical input always
//! produces identical output.

pub mod moving_average;
pub mod returns;
pub mod transform;

pub use moving_average::Sma;
pub use returns::DailyReturn;
pub use transform::{transform, SMA_WINDOW};
