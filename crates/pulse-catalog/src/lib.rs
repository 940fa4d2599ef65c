//! Instrument catalog and set selection.
//!
//! The catalog is loaded once at startup (built-in or from a TOML file) and
//! is immutable afterwards. The [`InstrumentSelector`] turns a named set into
//! the ordered work list for a run.

mod builtin;
mod catalog;
mod selector;
mod summary;

pub use catalog::{InstrumentCatalog, MarketCapGroup, Sector, SetDefinition};
pub use selector::InstrumentSelector;
pub use summary::{CatalogSummary, GroupCount};
