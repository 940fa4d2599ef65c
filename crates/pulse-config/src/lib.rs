//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `STOCKPULSE__SECTION__KEY` environment variables. Database credentials
//! missing after that are taken from `DB_HOST`, `DB_PORT`, `DB_USER`,
//! `DB_NAME` and `DB_PASS`.

mod settings;

pub use settings::{
    AppConfig, AppSettings, CatalogSettings, LoggingConfig, PipelineSettings, ProviderSettings,
    StorageSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tracing::debug;

/// Load configuration from file and environment.
///
/// A missing file is not an error; defaults and the environment still apply.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), exists = path.exists(), "Loading configuration");

    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("STOCKPULSE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut app: AppConfig = config.try_deserialize()?;
    app.database = app.database.with_env_fallback();
    Ok(app)
}
