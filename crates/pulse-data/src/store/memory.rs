//! In-memory storage.

use async_trait::async_trait;
use pulse_core::error::StorageError;
use pulse_core::traits::Storage;
use pulse_core::types::ProcessedSeries;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::validate_destination;

/// Process-local store keyed by destination.
///
/// Each upsert swaps in a whole new series, so readers see either the old
/// or the new contents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Arc<ProcessedSeries>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of destinations held.
    pub fn len(&self) -> usize {
        self.tables.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Connection("memory store lock poisoned".into())
}

#[async_trait]
impl Storage for MemoryStore {
    async fn upsert(
        &self,
        destination: &str,
        series: &ProcessedSeries,
    ) -> Result<usize, StorageError> {
        validate_destination(destination)?;
        let rows = series.len();
        let replacement = Arc::new(series.clone());
        self.tables
            .write()
            .map_err(|_| poisoned())?
            .insert(destination.to_string(), replacement);
        Ok(rows)
    }

    async fn read(&self, destination: &str) -> Result<ProcessedSeries, StorageError> {
        self.tables
            .read()
            .map_err(|_| poisoned())?
            .get(destination)
            .map(|s| s.as_ref().clone())
            .ok_or_else(|| StorageError::NotFound(destination.to_string()))
    }

    async fn destinations(&self) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = self
            .tables
            .read()
            .map_err(|_| poisoned())?
            .keys()
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        self.tables.read().map(|_| ()).map_err(|_| poisoned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
