//! Error types for the pipeline.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that stop a run before any instrument is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown instrument set '{name}' (available: {})", available.join(", "))]
    UnknownSet { name: String, available: Vec<String> },

    #[error("Unknown sector '{0}'")]
    UnknownSector(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Fetch adapter errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

impl DataError {
    /// Whether a later attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            DataError::ConnectionError(_) | DataError::RateLimited { .. } => true,
            DataError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the provider reported that it has nothing for the symbol.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::SymbolNotFound(_) | DataError::NoDataAvailable)
    }
}

/// Malformed data that survived the missing-value discard.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Non-finite {field} on {date}")]
    NonFinite { date: NaiveDate, field: &'static str },

    #[error("Negative {field} on {date}: {value}")]
    Negative {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("Zero close on {0}")]
    ZeroClose(NaiveDate),

    #[error("Duplicate observation for {0}")]
    DuplicateDate(NaiveDate),

    #[error("Observation for {current} follows {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        current: NaiveDate,
    },
}

/// Storage backend errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid destination name: {0}")]
    InvalidDestination(String),

    #[error("Destination not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Whether a later attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Connection(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(DataError::ConnectionError("reset".into()).is_transient());
        assert!(DataError::RateLimited { retry_after_secs: 5 }.is_transient());
        assert!(DataError::Http { status: 503, message: String::new() }.is_transient());
        assert!(!DataError::Http { status: 404, message: String::new() }.is_transient());
        assert!(!DataError::SymbolNotFound("X".into()).is_transient());

        assert!(StorageError::Connection("refused".into()).is_transient());
        assert!(!StorageError::Database("syntax".into()).is_transient());
    }

    #[test]
    fn test_unknown_set_message_lists_available() {
        let err = ConfigurationError::UnknownSet {
            name: "nope".into(),
            available: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown instrument set 'nope' (available: a, b)"
        );
    }
}
