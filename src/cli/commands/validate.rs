//! Validate configuration command.

use anyhow::Result;
use pulse_catalog::InstrumentSelector;
use pulse_config::AppConfig;
use std::path::Path;

use super::load_catalog;

pub fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!(
        "Validating configuration: {:?}{}",
        config_path,
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );

    config.validate()?;
    let catalog = load_catalog(config)?;
    let selector = InstrumentSelector::new(&catalog);
    let default_set = selector.resolve(&config.pipeline.default_set)?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!(
        "Storage backend: {} (resolved: {})",
        config.storage.backend,
        config.resolved_backend()
    );
    println!("Database: {}", config.database.display_url());
    println!(
        "Catalog: {} ({} instruments)",
        config.catalog.path.as_deref().unwrap_or("built-in NSE universe"),
        catalog.universe().len()
    );
    println!(
        "Default set: {} ({} instruments)",
        config.pipeline.default_set,
        default_set.len()
    );
    println!();

    let mut effective = config.clone();
    if effective.database.password.is_some() {
        effective.database.password = Some("***".to_string());
    }
    println!("{}", effective.to_toml()?);

    Ok(())
}
