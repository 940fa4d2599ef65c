//! CLI command implementations.

pub mod catalog;
pub mod run;
pub mod show;
pub mod validate;

use anyhow::{Context, Result};
use pulse_catalog::InstrumentCatalog;
use pulse_config::AppConfig;
use pulse_core::traits::Storage;
use pulse_data::{FileStore, MemoryStore, PostgresStore, StorageBackend};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The configured catalog file, or the built-in universe.
pub(crate) fn load_catalog(config: &AppConfig) -> Result<InstrumentCatalog> {
    match &config.catalog.path {
        Some(path) => InstrumentCatalog::from_file(Path::new(path))
            .with_context(|| format!("Failed to load catalog {}", path)),
        None => Ok(InstrumentCatalog::builtin()),
    }
}

/// Open the storage backend selected by the configuration.
pub(crate) async fn build_storage(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.resolved_backend() {
        StorageBackend::Postgres => Arc::new(
            PostgresStore::connect(&config.database)
                .await
                .with_context(|| format!("Failed to connect to {}", config.database.display_url()))?,
        ),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File | StorageBackend::Auto => Arc::new(
            FileStore::new(&config.storage.data_dir)
                .with_context(|| format!("Failed to open {}", config.storage.data_dir))?,
        ),
    };

    storage
        .health_check()
        .await
        .with_context(|| format!("Storage backend '{}' is not healthy", storage.name()))?;
    info!(backend = storage.name(), "Storage ready");
    Ok(storage)
}
