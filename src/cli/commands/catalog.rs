//! Catalog command implementation.

use anyhow::Result;
use pulse_catalog::CatalogSummary;
use pulse_config::AppConfig;

use super::load_catalog;
use crate::cli::{CatalogArgs, OutputFormat};

pub fn run(args: CatalogArgs, config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(config)?;

    let Some(name) = &args.sector else {
        let summary = CatalogSummary::from_catalog(&catalog);
        match args.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => println!("{}", summary.render()),
        }
        return Ok(());
    };

    let symbols = catalog.symbols_by_sector(name)?;
    let instruments: Vec<_> = symbols.iter().map(|s| catalog.instrument(s)).collect();

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&instruments)?),
        OutputFormat::Text => {
            if let Some(sector) = catalog.sector(name) {
                println!("{} ({} symbols)", sector.description, symbols.len());
            }
            for instrument in &instruments {
                println!(
                    "  {:<18} {:<10} {}",
                    instrument.symbol,
                    instrument.market_cap.as_deref().unwrap_or("-"),
                    instrument.destination()
                );
            }
        }
    }

    Ok(())
}
