//! Configuration for the record service.

use std::path::PathBuf;

use query_engine_metadata::metadata;

use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::values::Secret;
use crate::version1::{BulkSettings, ParsedConfiguration};

/// The 'Configuration' type collects all the information necessary to serve requests at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', once every environment variable has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub metadata: metadata::Metadata,
    pub bulk: BulkSettings,
    /// As written in the configuration; relative to the configuration directory.
    pub data_file: Option<PathBuf>,
}

/// Resolve a parsed configuration into the runtime configuration.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let data_file = match parsed_config.store.data_file {
        None => None,
        Some(data_file) => Some(PathBuf::from(match data_file.0 {
            Secret::Plain(path) => path,
            Secret::FromEnvironment { variable } => environment.read(&variable)?,
        })),
    };

    Ok(Configuration {
        metadata: metadata::Metadata {
            pagination: parsed_config.pagination,
            ..metadata::Metadata::default()
        },
        bulk: parsed_config.bulk,
        data_file,
    })
}
