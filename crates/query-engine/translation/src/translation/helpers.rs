//! Helpers for processing requests and building queries.

use query_engine_metadata::metadata;

/// Static information available throughout translation.
#[derive(Debug)]
pub struct Env<'a> {
    pub metadata: &'a metadata::Metadata,
}

/// Things noticed during translation, reported back to the caller.
#[derive(Debug, Default)]
pub struct State {
    warnings: Vec<Warning>,
}

/// A part of the request the translator chose to leave out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A raw composition parameter we could not use.
    DroppedCondition { parameter: String, reason: String },
    IgnoredSortField(String),
    IgnoredProjectionField(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Warning::DroppedCondition { parameter, reason } => {
                write!(f, "ignoring invalid '{parameter}' condition: {reason}")
            }
            Warning::IgnoredSortField(name) => write!(f, "ignoring unknown sort field '{name}'"),
            Warning::IgnoredProjectionField(name) => {
                write!(f, "ignoring unknown projection field '{name}'")
            }
        }
    }
}

impl<'a> Env<'a> {
    pub fn new(metadata: &'a metadata::Metadata) -> Self {
        Env { metadata }
    }
}

impl State {
    /// Log and remember a warning.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(%warning, "query parameter dropped");
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
