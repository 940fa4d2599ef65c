//! StockPulse CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pulse_config::load_config;
use pulse_monitor::{setup_logging, LogFormat};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    config.validate()?;

    // Setup logging
    let log_level = match cli.log_level {
        Some(level) => level.as_str().to_string(),
        None => config.logging.level.clone(),
    };
    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        config
            .logging
            .format
            .parse()
            .map_err(anyhow::Error::msg)?
    };
    let _log_guard = setup_logging(
        &log_level,
        log_format,
        config.logging.file.as_deref().map(Path::new),
    )?;

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, &config).await,
        Commands::Catalog(args) => cli::commands::catalog::run(args, &config),
        Commands::Show(args) => cli::commands::show::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config),
    }
}
