//! Run command implementation.

use anyhow::{Context, Result};
use pulse_catalog::{CatalogSummary, InstrumentCatalog, InstrumentSelector};
use pulse_config::AppConfig;
use pulse_core::error::ConfigurationError;
use pulse_core::traits::DataSource;
use pulse_data::{CsvDataSource, YahooDataSource};
use pulse_pipeline::Pipeline;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::{build_storage, load_catalog};
use crate::cli::{OutputFormat, RunArgs};

pub async fn run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(config)?;

    if args.summary {
        println!("{}", CatalogSummary::from_catalog(&catalog).render());
        return Ok(());
    }

    // Resolve the work list before touching any adapter.
    let symbols = work_list(&args, config, &catalog)?;

    let mut pipeline_config = config.pipeline_config();
    if let Some(days) = args.lookback_days {
        anyhow::ensure!(days > 0, "--lookback-days must be at least 1");
        pipeline_config.lookback_days = days;
    }

    let source: Arc<dyn DataSource> = match &args.offline {
        Some(dir) => {
            // Inputs already are raw files; do not archive them again.
            pipeline_config.raw_dir = None;
            Arc::new(
                CsvDataSource::new(dir)
                    .with_context(|| format!("Cannot read offline data from {}", dir.display()))?,
            )
        }
        None => Arc::new(YahooDataSource::new(config.provider.yahoo.clone())?),
    };

    let persist = !args.no_persist;
    let storage = if persist {
        Some(build_storage(config).await?)
    } else {
        None
    };

    let workers = args.workers.unwrap_or(config.pipeline.workers);
    let pipeline = Pipeline::new(pipeline_config, source, storage);
    let report = pipeline.run_concurrent(&symbols, persist, workers).await;

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Run report saved to {:?}", save_path);
    }

    Ok(())
}

/// Explicit symbols (trimmed, first occurrence kept) or the resolved set.
fn work_list(
    args: &RunArgs,
    config: &AppConfig,
    catalog: &InstrumentCatalog,
) -> Result<Vec<String>, ConfigurationError> {
    if !args.symbols.is_empty() {
        let mut seen = HashSet::new();
        return Ok(args
            .symbols
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect());
    }

    let set = args.set.as_deref().unwrap_or(&config.pipeline.default_set);
    let symbols = InstrumentSelector::new(catalog).resolve(set)?;
    info!(set, instruments = symbols.len(), "Resolved instrument set");
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::parse_from(["stockpulse", "run"].iter().chain(argv).copied());
        match cli.command {
            Commands::Run(args) => args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_unknown_set_is_rejected() {
        let catalog = InstrumentCatalog::builtin();
        let config = AppConfig::default();

        let err = work_list(&run_args(&["--set", "penny_stocks"]), &config, &catalog).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownSet { ref name, .. } if name == "penny_stocks"));
    }

    #[test]
    fn test_unknown_default_set_is_rejected() {
        let catalog = InstrumentCatalog::builtin();
        let mut config = AppConfig::default();
        config.pipeline.default_set = "missing".into();

        assert!(work_list(&run_args(&[]), &config, &catalog).is_err());
    }

    #[test]
    fn test_set_and_explicit_symbols() {
        let catalog = InstrumentCatalog::builtin();
        let config = AppConfig::default();

        let from_set = work_list(&run_args(&["--set", "tech_focused"]), &config, &catalog).unwrap();
        assert_eq!(
            from_set,
            InstrumentSelector::new(&catalog).resolve("tech_focused").unwrap()
        );

        let explicit = work_list(
            &run_args(&["--symbols", "TCS.NS, INFY.NS,TCS.NS"]),
            &config,
            &catalog,
        )
        .unwrap();
        assert_eq!(explicit, vec!["TCS.NS", "INFY.NS"]);
    }
}
