//! Fetch adapter trait definitions.

use crate::error::DataError;
use crate::types::RawSeries;
use async_trait::async_trait;

/// Trait for daily price history providers.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch daily observations.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `lookback_days` - Calendar days to look back from today
    ///
    /// # Returns
    /// A series ordered from oldest to newest, or
    /// [`DataError::SymbolNotFound`] when the provider has nothing for the symbol
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<RawSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawObservation;
    use chrono::NaiveDate;

    struct FixedSource;

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch(&self, symbol: &str, _lookback_days: u32) -> Result<RawSeries, DataError> {
            if symbol == "MISSING" {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            Ok(RawSeries::new(
                symbol,
                vec![RawObservation::new(date, 1.0, 1.0, 1.0, 1.0, 1.0)],
            ))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_data_source_object_safety() {
        let source: Box<dyn DataSource> = Box::new(FixedSource);
        assert_eq!(source.name(), "fixed");
    }

    #[tokio::test]
    async fn test_not_found_is_reported() {
        let source = FixedSource;
        let err = source.fetch("MISSING", 60).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(source.fetch("TCS.NS", 60).await.unwrap().len(), 1);
    }
}
