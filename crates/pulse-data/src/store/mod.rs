//! Persistence backends for processed series.

mod file;
mod memory;
mod postgres;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};

use pulse_core::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which storage backend a run persists into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Postgres when database credentials are configured, files otherwise
    #[default]
    Auto,
    Postgres,
    File,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageBackend::Auto => "auto",
            StorageBackend::Postgres => "postgres",
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(StorageBackend::Auto),
            "postgres" | "postgresql" | "db" => Ok(StorageBackend::Postgres),
            "file" | "csv" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("unknown storage backend: {}", s)),
        }
    }
}

/// Longest identifier Postgres accepts without truncation.
const MAX_DESTINATION_LEN: usize = 63;

/// Check that a destination is a safe table/file name.
pub(crate) fn validate_destination(destination: &str) -> Result<(), StorageError> {
    let valid = !destination.is_empty()
        && destination.len() <= MAX_DESTINATION_LEN
        && destination
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !destination.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidDestination(destination.to_string()))
    }
}
