//! Instruments and the names derived from their symbols.

use serde::{Deserialize, Serialize};

/// A tradable symbol tracked by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// Provider symbol, e.g. `RELIANCE.NS`
    pub symbol: String,
    /// Sector the instrument was declared under
    pub sector: Option<String>,
    /// Market-cap bucket (`large_cap`, `mid_cap`, `small_cap`)
    pub market_cap: Option<String>,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            sector: None,
            market_cap: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_market_cap(mut self, market_cap: impl Into<String>) -> Self {
        self.market_cap = Some(market_cap.into());
        self
    }

    /// Storage destination for this instrument.
    pub fn destination(&self) -> String {
        destination_name(&self.symbol)
    }
}

fn substitute_separators(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Storage destination for a symbol: `stock_` followed by the lower-cased
/// symbol with every non-alphanumeric character replaced by `_`.
pub fn destination_name(symbol: &str) -> String {
    format!("stock_{}", substitute_separators(symbol).to_ascii_lowercase())
}

/// File stem for a symbol's CSV artifacts (`RELIANCE.NS` -> `RELIANCE_NS`).
pub fn file_stem(symbol: &str) -> String {
    substitute_separators(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_name() {
        assert_eq!(destination_name("RELIANCE.NS"), "stock_reliance_ns");
        assert_eq!(destination_name("M&M.NS"), "stock_m_m_ns");
        assert_eq!(destination_name("BAJAJ-AUTO.NS"), "stock_bajaj_auto_ns");
        assert_eq!(destination_name("reliance.ns"), destination_name("RELIANCE.NS"));
    }

    #[test]
    fn test_file_stem_keeps_case() {
        assert_eq!(file_stem("RELIANCE.NS"), "RELIANCE_NS");
        assert_eq!(file_stem("M&M.NS"), "M_M_NS");
    }

    #[test]
    fn test_instrument_builder() {
        let inst = Instrument::new("TCS.NS")
            .with_sector("technology")
            .with_market_cap("large_cap");

        assert_eq!(inst.sector.as_deref(), Some("technology"));
        assert_eq!(inst.market_cap.as_deref(), Some("large_cap"));
        assert_eq!(inst.destination(), "stock_tcs_ns");
    }
}
