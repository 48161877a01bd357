//! Errors for query translation.

use query_engine_metadata::metadata::LogicalField;
use thiserror::Error;

/// A parameter the translator refuses. These are the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("'{parameter}' must be a number, got '{value}'")]
    InvalidRangeBound { parameter: String, value: String },
    #[error("'{parameter}' must be a date (YYYY-MM-DD or RFC 3339), got '{value}'")]
    InvalidDate { parameter: String, value: String },
    #[error("'{value}' is not a valid value for '{field}'")]
    InvalidFieldValue { field: LogicalField, value: String },
}
