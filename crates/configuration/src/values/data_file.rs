use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Secret;

/// Path of a JSON file holding the records to serve. Relative paths are
/// relative to the configuration directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct DataFile(pub Secret);

impl From<String> for DataFile {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for DataFile {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
