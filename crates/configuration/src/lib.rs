pub mod configuration;
pub mod environment;
pub mod error;
pub mod values;
pub mod version1;

pub use configuration::{make_runtime_configuration, Configuration};
pub use version1::{
    generate_latest_schema, parse_configuration, write_parsed_configuration, BulkSettings,
    ParsedConfiguration, StoreSettings, CONFIGURATION_FILENAME, CONFIGURATION_JSONSCHEMA_FILENAME,
};
