//! Handle filter translation.
//!
//! Each filter source becomes its own disjunction group, and the filter is the
//! conjunction of the groups. A field condition expands to one alternative per
//! naming convention, since a stored record uses either of them.

use query_engine_document::document::ast::{Expression, FieldPath, Filter};
use query_engine_document::document::helpers;
use query_engine_document::document::parse;
use query_engine_metadata::metadata::{LogicalField, SystemField};

use super::values;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State, Warning};
use crate::translation::params::{self, ParamValue, QueryParams};

/// Translate every filtering parameter into a filter.
pub fn translate_filter(
    env: &Env,
    state: &mut State,
    params: &QueryParams,
) -> Result<Filter, Error> {
    let mut groups = vec![];

    groups.extend(translate_search(env, params));
    groups.extend(translate_field_conditions(params)?);
    groups.extend(translate_ranges(params)?);
    groups.extend(translate_date_window(params)?);
    groups.extend(translate_composition(state, params, params::OR));
    groups.extend(translate_composition(state, params, params::AND));

    Ok(Filter { groups })
}

/// Free text search: a case insensitive substring of any search field, under
/// either name.
fn translate_search(env: &Env, params: &QueryParams) -> Option<Expression> {
    let needle = params.first(params::SEARCH)?;
    Some(Expression::Or(
        env.metadata
            .search_fields
            .iter()
            .flat_map(|field| field.stored_names())
            .map(|name| helpers::contains(FieldPath::from(name), needle))
            .collect(),
    ))
}

/// `field=value` equality, or membership when the parameter is repeated.
fn translate_field_conditions(params: &QueryParams) -> Result<Vec<Expression>, Error> {
    params
        .iter()
        .filter(|(name, _)| !params::is_reserved(name))
        .filter_map(|(name, value)| {
            LogicalField::from_schema_name(name).map(|field| (field, value))
        })
        .filter_map(|(field, value)| translate_field_condition(field, value).transpose())
        .collect()
}

fn translate_field_condition(
    field: LogicalField,
    value: &ParamValue,
) -> Result<Option<Expression>, Error> {
    match value {
        ParamValue::Single(raw) if raw.trim().is_empty() => Ok(None),
        ParamValue::Single(raw) => {
            let value = values::translate_field_value(field, raw)?;
            Ok(Some(helpers::any_of(field.stored_names(), |path| {
                helpers::equals(path, value.clone())
            })))
        }
        ParamValue::Many(raws) => {
            let values = raws
                .iter()
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| values::translate_field_value(field, raw))
                .collect::<Result<Vec<_>, Error>>()?;
            if values.is_empty() {
                return Ok(None);
            }
            Ok(Some(helpers::any_of(field.stored_names(), |path| {
                helpers::one_of(path, values.clone())
            })))
        }
    }
}

/// `<field>_min` / `<field>_max` bounds. Both bounds of a field go into one
/// range condition per naming convention, so neither can be relaxed by the other.
fn translate_ranges(params: &QueryParams) -> Result<Vec<Expression>, Error> {
    LogicalField::numeric()
        .filter_map(|field| translate_range(params, field).transpose())
        .collect()
}

fn translate_range(params: &QueryParams, field: LogicalField) -> Result<Option<Expression>, Error> {
    let bound = |suffix: &str| {
        let parameter = format!("{}{suffix}", field.schema_name());
        params
            .first(&parameter)
            .map(|raw| values::translate_range_bound(&parameter, raw))
            .transpose()
    };
    let lower = bound(params::MIN_SUFFIX)?;
    let upper = bound(params::MAX_SUFFIX)?;

    if lower.is_none() && upper.is_none() {
        return Ok(None);
    }
    Ok(Some(helpers::any_of(field.stored_names(), |path| {
        helpers::inclusive_range(path, lower.clone(), upper.clone())
    })))
}

/// `date_from` / `date_to` bound the creation timestamp, which has a single name.
fn translate_date_window(params: &QueryParams) -> Result<Option<Expression>, Error> {
    let bound = |parameter: &str| {
        params
            .first(parameter)
            .map(|raw| values::translate_date(parameter, raw))
            .transpose()
    };
    let from = bound(params::DATE_FROM)?;
    let to = bound(params::DATE_TO)?;

    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    Ok(Some(helpers::inclusive_range(
        FieldPath::from(SystemField::CreatedAt.name()),
        from,
        to,
    )))
}

/// `$or` / `$and`: a JSON array of clauses written by the caller. Clauses are
/// kept verbatim. Anything we cannot parse is dropped rather than failing the
/// request.
fn translate_composition(
    state: &mut State,
    params: &QueryParams,
    parameter: &str,
) -> Option<Expression> {
    let raw = params.first(parameter)?;

    let clauses = serde_json::from_str::<serde_json::Value>(raw)
        .map_err(|err| err.to_string())
        .and_then(|document| {
            // validate that every clause is one we can evaluate
            parse::parse_clauses(parameter, &document).map_err(|err| err.to_string())?;
            match document {
                serde_json::Value::Array(clauses) if !clauses.is_empty() => Ok(clauses),
                _ => Err(format!("'{parameter}' needs at least one clause")),
            }
        });

    match clauses {
        Ok(clauses) => {
            let raw_clauses = clauses.into_iter().map(Expression::Raw).collect();
            if parameter == params::OR {
                Some(Expression::Or(raw_clauses))
            } else {
                Some(Expression::And(raw_clauses))
            }
        }
        Err(reason) => {
            state.warn(Warning::DroppedCondition {
                parameter: parameter.to_string(),
                reason,
            });
            None
        }
    }
}
