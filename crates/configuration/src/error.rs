//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::environment;

#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("invalid configuration in {file_path}: {error}")]
    ValidationError {
        file_path: PathBuf,
        error: ValidationError,
    },
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// A configuration which parses, but makes no sense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported configuration version {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("pagination.defaultLimit must be at least 1")]
    DefaultLimitTooSmall,
    #[error("pagination.maxLimit ({max_limit}) must not be below pagination.defaultLimit ({default_limit})")]
    MaxLimitBelowDefault { default_limit: u64, max_limit: u64 },
    #[error("bulk.maxRecords must be at least 1")]
    MaxRecordsTooSmall,
}

#[derive(Debug, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("invalid configuration, {message}")]
    MissingEnvironmentVariable {
        file_path: PathBuf,
        message: String,
    },
}

impl From<environment::Error> for MakeRuntimeConfigurationError {
    fn from(error: environment::Error) -> Self {
        MakeRuntimeConfigurationError::MissingEnvironmentVariable {
            file_path: PathBuf::from(crate::CONFIGURATION_FILENAME),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unable to serialize configuration: {0}")]
    JsonError(#[from] serde_json::Error),
}
