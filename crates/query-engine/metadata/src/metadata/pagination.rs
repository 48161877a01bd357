//! Page size settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for page sizes requested through the `limit` parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSettings {
    /// page size used when `limit` is absent or unusable
    #[serde(default = "default_limit_default")]
    pub default_limit: u64,
    /// largest page size a client may request
    #[serde(default = "max_limit_default")]
    pub max_limit: u64,
}

impl PaginationSettings {
    pub fn is_default(&self) -> bool {
        *self == PaginationSettings::default()
    }
}

impl Default for PaginationSettings {
    fn default() -> PaginationSettings {
        PaginationSettings {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

// for serde default //
fn default_limit_default() -> u64 {
    PaginationSettings::default().default_limit
}
fn max_limit_default() -> u64 {
    PaginationSettings::default().max_limit
}
