//! Instrument catalog: sectors, market-cap groups and named sets.

use pulse_core::error::ConfigurationError;
use pulse_core::types::Instrument;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Symbols declared under one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Sector key, e.g. `technology`
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
    /// Portfolio weight used for analysis
    #[serde(default)]
    pub weight: Option<f64>,
    /// Symbols in declaration order
    pub symbols: Vec<String>,
}

/// Symbols in one market-cap bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCapGroup {
    pub name: String,
    pub symbols: Vec<String>,
}

/// A named instrument set.
///
/// Members are, in order: every sector's symbols when `all_sectors` is set,
/// then the listed `sectors`, then the explicit `symbols`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetDefinition {
    pub name: String,
    #[serde(default)]
    pub all_sectors: bool,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Immutable lookup table of everything the pipeline may ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    #[serde(default)]
    pub(crate) sectors: Vec<Sector>,
    #[serde(default)]
    pub(crate) market_caps: Vec<MarketCapGroup>,
    #[serde(default)]
    pub(crate) sets: Vec<SetDefinition>,
}

impl InstrumentCatalog {
    /// Build and validate a catalog.
    pub fn new(
        sectors: Vec<Sector>,
        market_caps: Vec<MarketCapGroup>,
        sets: Vec<SetDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let catalog = Self {
            sectors,
            market_caps,
            sets,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in NSE universe.
    pub fn builtin() -> Self {
        crate::builtin::nse_universe()
    }

    /// Parse a catalog from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigurationError> {
        let catalog: Self =
            toml::from_str(s).map_err(|e| ConfigurationError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::InvalidCatalog(format!("{}: {}", path.display(), e))
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            sectors = catalog.sectors.len(),
            sets = catalog.sets.len(),
            "Loaded instrument catalog"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for sector in &self.sectors {
            if !seen.insert(sector.name.as_str()) {
                return Err(ConfigurationError::InvalidCatalog(format!(
                    "sector '{}' declared twice",
                    sector.name
                )));
            }
            if let Some(w) = sector.weight {
                if !(0.0..=1.0).contains(&w) {
                    return Err(ConfigurationError::InvalidCatalog(format!(
                        "sector '{}' weight {} outside 0..=1",
                        sector.name, w
                    )));
                }
            }
        }

        let mut set_names = HashSet::new();
        for set in &self.sets {
            if !set_names.insert(set.name.as_str()) {
                return Err(ConfigurationError::InvalidCatalog(format!(
                    "set '{}' declared twice",
                    set.name
                )));
            }
            for sector in &set.sectors {
                if self.sector(sector).is_none() {
                    return Err(ConfigurationError::InvalidCatalog(format!(
                        "set '{}' references unknown sector '{}'",
                        set.name, sector
                    )));
                }
            }
        }
        Ok(())
    }

    /// All sectors in declaration order.
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// All sector names in declaration order.
    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.name.as_str()).collect()
    }

    /// Get sector info by name.
    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.name == name)
    }

    /// Symbols declared under a sector.
    pub fn symbols_by_sector(&self, name: &str) -> Result<&[String], ConfigurationError> {
        self.sector(name)
            .map(|s| s.symbols.as_slice())
            .ok_or_else(|| ConfigurationError::UnknownSector(name.to_string()))
    }

    /// Market-cap groups in declaration order.
    pub fn market_caps(&self) -> &[MarketCapGroup] {
        &self.market_caps
    }

    /// Symbols in a market-cap bucket, empty when the bucket is unknown.
    pub fn symbols_by_market_cap(&self, name: &str) -> &[String] {
        self.market_caps
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.symbols.as_slice())
            .unwrap_or(&[])
    }

    /// Sector weights in declaration order (sectors without one are skipped).
    pub fn sector_weights(&self) -> Vec<(&str, f64)> {
        self.sectors
            .iter()
            .filter_map(|s| s.weight.map(|w| (s.name.as_str(), w)))
            .collect()
    }

    /// Named set definitions in declaration order.
    pub fn sets(&self) -> &[SetDefinition] {
        &self.sets
    }

    /// Get all set names.
    pub fn set_names(&self) -> Vec<&str> {
        self.sets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Check if a set exists.
    pub fn has_set(&self, name: &str) -> bool {
        self.sets.iter().any(|s| s.name == name)
    }

    pub(crate) fn set(&self, name: &str) -> Option<&SetDefinition> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Every distinct symbol declared under a sector, in declaration order.
    pub fn universe(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sectors
            .iter()
            .flat_map(|s| s.symbols.iter())
            .map(String::as_str)
            .filter(|sym| seen.insert(*sym))
            .collect()
    }

    /// Describe a symbol with the first sector and market-cap bucket that list it.
    pub fn instrument(&self, symbol: &str) -> Instrument {
        let mut instrument = Instrument::new(symbol);
        if let Some(sector) = self
            .sectors
            .iter()
            .find(|s| s.symbols.iter().any(|x| x == symbol))
        {
            instrument = instrument.with_sector(&sector.name);
        }
        if let Some(group) = self
            .market_caps
            .iter()
            .find(|g| g.symbols.iter().any(|x| x == symbol))
        {
            instrument = instrument.with_market_cap(&group.name);
        }
        instrument
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
