//! Validation and parse errors for project records.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// Project number is empty or whitespace-only.
    #[error("project number must not be empty")]
    EmptyNumber,

    /// A percentage field is outside 0-100.
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    /// A monetary field is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    /// Unknown service name in stored data.
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// Unknown transfer method in stored data.
    #[error("unknown transfer method: {0}")]
    UnknownTransferMethod(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
