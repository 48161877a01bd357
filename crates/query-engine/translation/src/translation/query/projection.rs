//! Translate the `fields` parameter.

use query_engine_document::document::ast::{FieldPath, Projection};
use query_engine_document::document::helpers;
use query_engine_metadata::metadata::{LogicalField, SystemField};

use crate::translation::helpers::{State, Warning};
use crate::translation::params::{self, QueryParams};

/// Convert `fields=city,no` into the stored names to return. A logical field
/// is requested under both of its names. When every requested name is unknown
/// only the identifier is returned.
pub fn translate_projection(state: &mut State, params: &QueryParams) -> Projection {
    let Some(raw) = params.first(params::FIELDS) else {
        return helpers::all_fields();
    };

    let mut fields: Vec<FieldPath> = vec![];
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let names: Vec<&str> = if let Some(field) = LogicalField::from_schema_name(name) {
            field.stored_names().to_vec()
        } else if let Some(field) = SystemField::from_name(name) {
            vec![field.name()]
        } else {
            state.warn(Warning::IgnoredProjectionField(name.to_string()));
            continue;
        };

        for name in names {
            let path = FieldPath::from(name);
            if !fields.contains(&path) {
                fields.push(path);
            }
        }
    }

    if fields.is_empty() {
        fields.push(FieldPath::from(SystemField::Id.name()));
    }
    Projection { fields }
}
