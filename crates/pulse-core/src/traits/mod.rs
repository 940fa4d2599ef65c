//! Core traits for the pipeline.

mod data_source;
mod indicator;
mod storage;

pub use data_source::DataSource;
pub use indicator::Indicator;
pub use storage::Storage;
