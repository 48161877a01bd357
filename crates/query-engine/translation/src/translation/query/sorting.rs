//! Translate the `sort` parameter.

use query_engine_document::document::ast::{Sort, SortDirection, SortElement};
use query_engine_document::document::helpers;
use query_engine_metadata::metadata::{LogicalField, SystemField};

use crate::translation::helpers::{State, Warning};
use crate::translation::params::{self, QueryParams};

/// Convert `sort=-temp,city` into sort elements.
///
/// A leading `-` sorts descending. A logical field sorts by whichever of its
/// names a record carries, so records of both conventions are ordered together.
/// Unknown names are skipped, and a field named twice keeps its first position.
/// Without any usable field we sort by creation time, newest first.
pub fn translate_sort(state: &mut State, params: &QueryParams) -> Sort {
    let Some(raw) = params.first(params::SORT) else {
        return helpers::default_sort();
    };

    let mut elements: Vec<SortElement> = vec![];
    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (token.strip_prefix('+').unwrap_or(token), SortDirection::Asc),
        };

        let element = if let Some(field) = LogicalField::from_schema_name(name) {
            helpers::sort_by(field.stored_names(), direction)
        } else if let Some(field) = SystemField::from_name(name) {
            helpers::sort_by([field.name()], direction)
        } else {
            state.warn(Warning::IgnoredSortField(name.to_string()));
            continue;
        };

        if !elements.iter().any(|seen| seen.target == element.target) {
            elements.push(element);
        }
    }

    if elements.is_empty() {
        helpers::default_sort()
    } else {
        Sort { elements }
    }
}
