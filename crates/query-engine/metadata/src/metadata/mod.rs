//! Metadata information regarding the environmental record collection.

pub mod fields;
pub mod identifier;
pub mod naming;
pub mod pagination;

// re-export without modules
pub use fields::*;
pub use identifier::*;
pub use naming::*;
pub use pagination::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata information.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub pagination: PaginationSettings,
    /// Logical fields matched by the free text `search` parameter.
    pub search_fields: Vec<LogicalField>,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            pagination: PaginationSettings::default(),
            search_fields: vec![LogicalField::City, LogicalField::MonthYear],
        }
    }
}
