//! Storage capability shared by every persistence backend.

use crate::error::StorageError;
use crate::types::ProcessedSeries;
use async_trait::async_trait;

/// Persistence for processed series, one destination per instrument.
///
/// `upsert` has replace-all semantics: after success the destination holds
/// exactly the supplied rows. Readers never observe a partially written
/// destination.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Replace the destination's contents, returning the number of rows written.
    async fn upsert(&self, destination: &str, series: &ProcessedSeries)
        -> Result<usize, StorageError>;

    /// Read a destination back, oldest row first.
    async fn read(&self, destination: &str) -> Result<ProcessedSeries, StorageError>;

    /// List the destinations currently stored, sorted by name.
    async fn destinations(&self) -> Result<Vec<String>, StorageError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Get the backend name.
    fn name(&self) -> &str;
}
