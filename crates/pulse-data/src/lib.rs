//! Fetch adapters and storage backends.
//!
//! Fetch adapters implement [`pulse_core::DataSource`]:
//! - [`YahooDataSource`] for the Yahoo Finance chart API
//! - [`CsvDataSource`] for a directory of raw CSV files
//!
//! Storage backends implement [`pulse_core::Storage`] with replace-all
//! upserts; see the [`store`] module.

mod csv_source;
mod yahoo;
pub mod store;

pub use csv_source::{read_raw_csv, write_raw_csv, CsvDataSource};
pub use store::{FileStore, MemoryStore, PostgresConfig, PostgresStore, StorageBackend};
pub use yahoo::{YahooConfig, YahooDataSource};
