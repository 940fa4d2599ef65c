//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockpulse")]
#[command(author, version, about = "Daily price ingestion with derived metrics")]
pub struct Cli {
    /// Configuration file path (optional; defaults apply when missing)
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, transform and load an instrument set
    Run(RunArgs),
    /// Show the instrument catalog
    Catalog(CatalogArgs),
    /// Print the most recent stored rows for a symbol
    Show(ShowArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Instrument set to process (defaults to pipeline.default_set)
    #[arg(short, long, conflicts_with = "symbols")]
    pub set: Option<String>,

    /// Symbols to process instead of a set (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Fetch and transform only
    #[arg(long)]
    pub no_persist: bool,

    /// Print the catalog summary and exit
    #[arg(long)]
    pub summary: bool,

    /// Instruments processed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Days of history to request
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Read raw CSV files from this directory instead of the provider
    #[arg(long)]
    pub offline: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON run report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CatalogArgs {
    /// List the symbols of one sector
    #[arg(long)]
    pub sector: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Symbol, e.g. RELIANCE.NS
    pub symbol: String,

    /// Number of most recent rows
    #[arg(short = 'n', long, default_value = "3")]
    pub rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "stockpulse",
            "run",
            "--symbols",
            "TCS.NS,INFY.NS",
            "--no-persist",
            "--workers",
            "4",
            "--output",
            "json",
        ]);

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.symbols, vec!["TCS.NS", "INFY.NS"]);
                assert!(args.no_persist);
                assert_eq!(args.workers, Some(4));
                assert!(matches!(args.output, OutputFormat::Json));
                assert!(args.set.is_none());
            }
            _ => panic!("expected run"),
        }
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_set_conflicts_with_symbols() {
        let result = Cli::try_parse_from([
            "stockpulse", "run", "--set", "tech_focused", "--symbols", "TCS.NS",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::parse_from(["stockpulse", "-l", "debug", "show", "RELIANCE.NS"]);
        match cli.command {
            Commands::Show(args) => {
                assert_eq!(args.symbol, "RELIANCE.NS");
                assert_eq!(args.rows, 3);
            }
            _ => panic!("expected show"),
        }
        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
    }
}
