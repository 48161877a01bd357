//! The two naming conventions records are stored under, and how to read across them.
//!
//! Records written through the structured API use schema names (`temp`), records
//! that arrived through a bulk CSV import use human readable labels (`Temp (°C)`).
//! Nothing migrates one to the other, so every read must accept both.

use serde_json::{Map, Value};

use super::fields::LogicalField;

/// A stored record: a JSON object keyed by field names of either convention.
pub type Document = Map<String, Value>;

/// Read a logical field, preferring the schema name. Nulls count as absent.
pub fn field_value(document: &Document, field: LogicalField) -> Option<&Value> {
    field
        .stored_names()
        .into_iter()
        .filter_map(|name| document.get(name))
        .find(|value| !value.is_null())
}

/// Rewrite a document so every logical field is keyed by its schema name.
///
/// Keys that are not legacy names are kept untouched. When a document carries
/// both names for one field, the schema name wins.
pub fn normalize_document(document: &Document) -> Document {
    let mut normalized = Map::new();
    for (key, value) in document {
        match LogicalField::from_legacy_name(key) {
            Some(_) => {}
            None => {
                normalized.insert(key.clone(), value.clone());
            }
        }
    }
    for field in LogicalField::all() {
        if let Some(value) = field_value(document, field) {
            normalized.insert(field.schema_name().to_string(), value.clone());
        }
    }
    normalized
}
