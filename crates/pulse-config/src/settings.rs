//! Configuration structures.

use pulse_core::error::ConfigurationError;
use pulse_data::{PostgresConfig, StorageBackend, YahooConfig};
use pulse_pipeline::{PipelineConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub database: PostgresConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stockpulse".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Market data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub lookback_days: u32,
    pub yahoo: YahooConfig,
    pub retry: RetryPolicy,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            yahoo: YahooConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Where processed and raw series go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// File store directory
    pub data_dir: String,
    /// Raw archive directory; archival is off when unset
    pub raw_dir: Option<String>,
    pub retry: RetryPolicy,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Auto,
            data_dir: "data/processed".to_string(),
            raw_dir: Some("data/raw".to_string()),
            retry: RetryPolicy::default(),
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Instrument set used when none is given
    pub default_set: String,
    /// Instruments processed concurrently (1 = sequential)
    pub workers: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            default_set: "nifty_50_sample".to_string(),
            workers: 1,
        }
    }
}

/// Instrument catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// TOML catalog file; the built-in NSE universe is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl AppConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.provider.lookback_days == 0 {
            return Err(ConfigurationError::Invalid(
                "provider.lookback_days must be at least 1".into(),
            ));
        }
        if self.pipeline.workers == 0 {
            return Err(ConfigurationError::Invalid(
                "pipeline.workers must be at least 1".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "compact" | "json") {
            return Err(ConfigurationError::Invalid(format!(
                "logging.format '{}' is not one of pretty, compact, json",
                self.logging.format
            )));
        }
        if self.storage.backend == StorageBackend::Postgres && !self.database.is_configured() {
            return Err(ConfigurationError::Invalid(
                "storage.backend is postgres but database host/password are not set".into(),
            ));
        }
        Ok(())
    }

    /// Backend after resolving `auto`.
    pub fn resolved_backend(&self) -> StorageBackend {
        match self.storage.backend {
            StorageBackend::Auto if self.database.is_configured() => StorageBackend::Postgres,
            StorageBackend::Auto => StorageBackend::File,
            other => other,
        }
    }

    /// Orchestrator configuration derived from these settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            lookback_days: self.provider.lookback_days,
            fetch_retry: self.provider.retry,
            load_retry: self.storage.retry,
            raw_dir: self.storage.raw_dir.as_ref().map(PathBuf::from),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.provider.lookback_days, 60);
        assert_eq!(config.pipeline.default_set, "nifty_50_sample");
        assert_eq!(config.database.port, 6543);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auto_backend_resolution() {
        let mut config = AppConfig::default();
        assert_eq!(config.resolved_backend(), StorageBackend::File);

        config.database.host = Some("db.example.com".into());
        config.database.password = Some("secret".into());
        assert_eq!(config.resolved_backend(), StorageBackend::Postgres);

        config.storage.backend = StorageBackend::Memory;
        assert_eq!(config.resolved_backend(), StorageBackend::Memory);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.pipeline.workers = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_config() {
        let mut config = AppConfig::default();
        config.provider.retry.max_attempts = 3;
        config.storage.raw_dir = None;

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.lookback_days, 60);
        assert_eq!(pipeline.fetch_retry.max_attempts, 3);
        assert_eq!(pipeline.load_retry.max_attempts, 1);
        assert!(pipeline.raw_dir.is_none());
    }

    #[test]
    fn test_toml_render() {
        let text = AppConfig::default().to_toml().unwrap();
        assert!(text.contains("[provider]"));
        assert!(text.contains("lookback_days = 60"));
        assert!(text.contains("backend = \"auto\""));
    }
}
