//! Error types for the project table store.
//!
//! A missing store file and malformed dates are not represented here; both
//! are recovered during load (empty table and null dates respectively).
//! Everything below is fatal and propagates to the caller unrecovered.

use std::path::PathBuf;
use thiserror::Error;

use ledger_model::ModelError;

/// Errors that can occur while loading, saving, or mutating the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system operation failed (permissions, disk, ...).
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file exists but could not be parsed as CSV.
    #[error("failed to parse store file {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Store file could not be serialized or written.
    #[error("failed to write store file {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    /// Temp file could not be renamed over the store file.
    #[error("failed to complete atomic save to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed DataFrame operation (missing column, dtype mismatch, ...).
    #[error("table operation failed: {message}")]
    DataFrame { message: String },

    /// A record failed validation or a stored value is not representable.
    #[error(transparent)]
    InvalidRecord(#[from] ModelError),
}

impl From<polars::prelude::PolarsError> for StoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::CsvParse {
            path: PathBuf::from("/tmp/projects.csv"),
            message: "bad header".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse store file /tmp/projects.csv: bad header"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Quote".into());
        let store_err: StoreError = polars_err.into();
        assert!(matches!(store_err, StoreError::DataFrame { .. }));
    }
}
