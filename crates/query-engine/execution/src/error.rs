//! Errors raised by record stores.

use std::path::PathBuf;

use query_engine_document::document::parse::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot evaluate clause: {0}")]
    UnsupportedClause(#[from] ParseError),
    #[error("a record with id '{0}' already exists")]
    DuplicateId(String),
    #[error("unable to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse data file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("data file {path} must hold an array of objects")]
    InvalidDataFile { path: PathBuf },
}
