//! Resolution of named sets into run work lists.

use pulse_core::error::ConfigurationError;
use pulse_core::types::Instrument;
use std::collections::HashSet;

use crate::catalog::InstrumentCatalog;

/// Resolves set names against an explicitly supplied catalog.
#[derive(Debug, Clone, Copy)]
pub struct InstrumentSelector<'a> {
    catalog: &'a InstrumentCatalog,
}

impl<'a> InstrumentSelector<'a> {
    pub fn new(catalog: &'a InstrumentCatalog) -> Self {
        Self { catalog }
    }

    /// Ordered, deduplicated symbols of a named set.
    ///
    /// Order follows catalog declaration; when a symbol appears more than
    /// once the first occurrence wins. An unknown name yields no symbols.
    pub fn resolve(&self, set_name: &str) -> Result<Vec<String>, ConfigurationError> {
        let set = self
            .catalog
            .set(set_name)
            .ok_or_else(|| ConfigurationError::UnknownSet {
                name: set_name.to_string(),
                available: self
                    .catalog
                    .set_names()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })?;

        let mut candidates: Vec<&str> = Vec::new();
        if set.all_sectors {
            for sector in self.catalog.sectors() {
                candidates.extend(sector.symbols.iter().map(String::as_str));
            }
        }
        for name in &set.sectors {
            candidates.extend(
                self.catalog
                    .symbols_by_sector(name)?
                    .iter()
                    .map(String::as_str),
            );
        }
        candidates.extend(set.symbols.iter().map(String::as_str));

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|s| seen.insert(*s))
            .map(String::from)
            .collect())
    }

    /// Like [`resolve`](Self::resolve), with sector and market-cap tags attached.
    pub fn instruments(&self, set_name: &str) -> Result<Vec<Instrument>, ConfigurationError> {
        Ok(self
            .resolve(set_name)?
            .iter()
            .map(|s| self.catalog.instrument(s))
            .collect())
    }
}
