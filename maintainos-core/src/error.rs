//! Error types for the maintainOS core.

use thiserror::Error;

use crate::recurrence::RuleParseError;

/// Errors that can occur in maintainOS core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("Work order not found: {0}")]
    WorkItemNotFound(String),

    #[error("Recurrence rule error: {0}")]
    Rule(#[from] RuleParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for maintainOS core operations.
pub type CoreResult<T> = Result<T, CoreError>;
