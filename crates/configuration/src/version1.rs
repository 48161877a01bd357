//! Version 1 of the configuration file format.

use std::path::Path;

use schemars::{gen::SchemaSettings, schema::RootSchema, JsonSchema};
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_metadata::metadata::PaginationSettings;

use crate::error::{ParseConfigurationError, ValidationError, WriteParsedConfigurationError};
use crate::values::{DataFile, Secret, Variable};

const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";
pub const DEFAULT_DATA_FILE_VARIABLE: &str = "ENVSENSOR_DATA_FILE";

/// The configuration file as written by users.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using
    pub version: u32,
    #[serde(default)]
    #[serde(skip_serializing_if = "PaginationSettings::is_default")]
    pub pagination: PaginationSettings,
    #[serde(default)]
    #[serde(skip_serializing_if = "BulkSettings::is_default")]
    pub bulk: BulkSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Limits on bulk writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSettings {
    /// largest number of records a single bulk insert may carry
    #[serde(default = "max_records_default")]
    pub max_records: usize,
}

impl BulkSettings {
    pub fn is_default(&self) -> bool {
        *self == BulkSettings::default()
    }
}

impl Default for BulkSettings {
    fn default() -> BulkSettings {
        BulkSettings { max_records: 1000 }
    }
}

// for serde default //
fn max_records_default() -> usize {
    BulkSettings::default().max_records
}

/// Where records are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// JSON file with an array of records, in either naming convention.
    /// Without one the store starts empty.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<DataFile>,
}

impl ParsedConfiguration {
    /// The configuration written by `initialize`: defaults everywhere, with the
    /// data file read from the environment.
    pub fn initial() -> Self {
        Self {
            version: CURRENT_VERSION,
            pagination: PaginationSettings::default(),
            bulk: BulkSettings::default(),
            store: StoreSettings {
                data_file: Some(DataFile(Secret::FromEnvironment {
                    variable: Variable::from(DEFAULT_DATA_FILE_VARIABLE),
                })),
            },
        }
    }

    /// Check the settings agree with each other.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != CURRENT_VERSION {
            return Err(ValidationError::UnsupportedVersion(self.version));
        }
        if self.pagination.default_limit < 1 {
            return Err(ValidationError::DefaultLimitTooSmall);
        }
        if self.pagination.max_limit < self.pagination.default_limit {
            return Err(ValidationError::MaxLimitBelowDefault {
                default_limit: self.pagination.default_limit,
                max_limit: self.pagination.max_limit,
            });
        }
        if self.bulk.max_records < 1 {
            return Err(ValidationError::MaxRecordsTooSmall);
        }
        Ok(())
    }
}

/// Read and validate the configuration found in a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| {
            tracing::warn!(
                file_path = %configuration_file.display(),
                line = error.line(),
                column = error.column(),
                body = %error,
                "configuration is not valid JSON"
            );
            ParseConfigurationError::ParseError {
                file_path: configuration_file.clone(),
                line: error.line(),
                column: error.column(),
                message: error.to_string(),
            }
        })?;

    parsed_config.validate().map_err(|error| {
        tracing::warn!(
            file_path = %configuration_file.display(),
            body = %error,
            "configuration rejected"
        );
        ParseConfigurationError::ValidationError {
            file_path: configuration_file.clone(),
            error,
        }
    })?;

    tracing::debug!(
        file_path = %configuration_file.display(),
        version = parsed_config.version,
        "parsed configuration"
    );
    Ok(parsed_config)
}

/// Write the parsed configuration, and the schema of its format, into a directory on disk.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        &configuration_file,
        serde_json::to_string_pretty(&parsed_config)? + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = generate_latest_schema();
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)? + "\n",
    )
    .await?;

    tracing::info!(
        configuration = %configuration_file.display(),
        schema = %configuration_jsonschema_file_path.display(),
        "wrote configuration"
    );
    Ok(())
}

/// Generate the JSON schema of the configuration format.
pub fn generate_latest_schema() -> RootSchema {
    SchemaSettings::openapi3()
        .into_generator()
        .into_root_schema_for::<ParsedConfiguration>()
}
