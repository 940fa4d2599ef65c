//! Show command implementation.

use anyhow::{Context, Result};
use pulse_config::AppConfig;
use pulse_core::error::StorageError;
use pulse_core::types::destination_name;

use super::build_storage;
use crate::cli::ShowArgs;

pub async fn run(args: ShowArgs, config: &AppConfig) -> Result<()> {
    let storage = build_storage(config).await?;
    let destination = destination_name(&args.symbol);

    let series = match storage.read(&destination).await {
        Ok(series) => series,
        Err(StorageError::NotFound(_)) => {
            let known = storage.destinations().await.unwrap_or_default();
            anyhow::bail!(
                "No stored data for {} ({}); {} destinations available",
                args.symbol,
                destination,
                known.len()
            );
        }
        Err(e) => return Err(e).context(format!("Failed to read {}", destination)),
    };

    println!(
        "{} → {} ({} rows, backend {})",
        args.symbol,
        destination,
        series.len(),
        storage.name()
    );
    println!(
        "  {:<10} {:>10} {:>10} {:>10} {:>10} {:>12} {:>10} {:>10}",
        "date", "open", "high", "low", "close", "volume", "return", "sma_20"
    );

    let fmt_opt = |v: Option<f64>, precision: usize| match v {
        Some(x) => format!("{:.*}", precision, x),
        None => "-".to_string(),
    };

    for obs in series.last_n(args.rows).iter().rev() {
        println!(
            "  {:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.0} {:>10} {:>10}",
            obs.date.format("%Y-%m-%d"),
            obs.open,
            obs.high,
            obs.low,
            obs.close,
            obs.volume,
            fmt_opt(obs.daily_return, 6),
            fmt_opt(obs.sma_20, 2),
        );
    }

    Ok(())
}
