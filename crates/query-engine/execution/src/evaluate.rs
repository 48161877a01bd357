//! Evaluate the document AST against records held in memory.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use query_engine_document::document::ast::{
    ComparisonOperator, Expression, Filter, Projection, Sort, SortDirection, SortTarget, Value,
};
use query_engine_metadata::metadata::{Document, SystemField};

use crate::error::Error;

/// Whether a record satisfies every group of the filter.
pub fn matches_filter(filter: &Filter, document: &Document) -> Result<bool, Error> {
    for group in &filter.groups {
        if !matches(group, document)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether a record satisfies an expression.
pub fn matches(expression: &Expression, document: &Document) -> Result<bool, Error> {
    match expression {
        Expression::And(expressions) => {
            for expression in expressions {
                if !matches(expression, document)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Expression::Or(expressions) => {
            for expression in expressions {
                if matches(expression, document)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Expression::Comparison {
            path,
            operator,
            value,
        } => {
            let stored = document.get(path.as_str());
            Ok(match operator {
                ComparisonOperator::Equal => is_equal(stored, value),
                ComparisonOperator::NotEqual => !is_equal(stored, value),
                ComparisonOperator::LessThan => compare(stored, value) == Some(Ordering::Less),
                ComparisonOperator::LessThanOrEqualTo => matches!(
                    compare(stored, value),
                    Some(Ordering::Less | Ordering::Equal)
                ),
                ComparisonOperator::GreaterThan => {
                    compare(stored, value) == Some(Ordering::Greater)
                }
                ComparisonOperator::GreaterThanOrEqualTo => matches!(
                    compare(stored, value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
            })
        }
        Expression::In { path, values } => {
            let stored = document.get(path.as_str());
            Ok(values.iter().any(|value| is_equal(stored, value)))
        }
        Expression::Range { path, lower, upper } => {
            let stored = document.get(path.as_str());
            let above = lower.as_ref().map_or(true, |lower| {
                matches!(
                    compare(stored, lower),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            });
            let below = upper.as_ref().map_or(true, |upper| {
                matches!(
                    compare(stored, upper),
                    Some(Ordering::Less | Ordering::Equal)
                )
            });
            Ok(above && below)
        }
        Expression::Contains { path, needle } => Ok(match document.get(path.as_str()) {
            Some(serde_json::Value::String(text)) => {
                text.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => false,
        }),
        Expression::Raw(clause) => matches(&Expression::from_document(clause)?, document),
    }
}

/// Equality with a missing field holds only against null.
fn is_equal(stored: Option<&serde_json::Value>, value: &Value) -> bool {
    match (stored, value) {
        (None | Some(serde_json::Value::Null), Value::Null) => true,
        _ => compare(stored, value) == Some(Ordering::Equal),
    }
}

/// Order a stored value against a query value. Values of different types are
/// incomparable.
fn compare(stored: Option<&serde_json::Value>, value: &Value) -> Option<Ordering> {
    match (stored?, value) {
        (serde_json::Value::Number(stored), Value::Number(number)) => {
            stored.as_f64()?.partial_cmp(number)
        }
        (serde_json::Value::String(stored), Value::String(text)) => Some(stored.as_str().cmp(text)),
        (serde_json::Value::Bool(stored), Value::Bool(b)) => Some(stored.cmp(b)),
        (serde_json::Value::Null, Value::Null) => Some(Ordering::Equal),
        (stored, Value::DateTime(timestamp)) => Some(timestamp_of(stored)?.cmp(timestamp)),
        _ => None,
    }
}

/// A stored timestamp, as RFC 3339 text or as `{"$date": "..."}`.
fn timestamp_of(stored: &serde_json::Value) -> Option<DateTime<Utc>> {
    let text = match stored {
        serde_json::Value::String(text) => text,
        serde_json::Value::Object(object) => object.get("$date")?.as_str()?,
        _ => return None,
    };
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

/// Sort records in place. The sort is stable, so ties keep their current order.
pub fn sort_documents(documents: &mut [Document], sort: &Sort) {
    documents.sort_by(|left, right| {
        sort.elements
            .iter()
            .map(|element| {
                let ordering =
                    compare_keys(sort_key(left, &element.target), sort_key(right, &element.target));
                match element.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// The first non-null value among the target's paths.
fn sort_key<'a>(document: &'a Document, target: &SortTarget) -> Option<&'a serde_json::Value> {
    target
        .paths
        .iter()
        .filter_map(|path| document.get(path.as_str()))
        .find(|value| !value.is_null())
}

/// Missing values first, then numbers, then text, then anything else.
fn compare_keys(left: Option<&serde_json::Value>, right: Option<&serde_json::Value>) -> Ordering {
    fn rank(value: Option<&serde_json::Value>) -> u8 {
        match value.map(unwrap_date) {
            None => 0,
            Some(serde_json::Value::Number(_)) => 1,
            Some(serde_json::Value::String(_)) => 2,
            Some(_) => 3,
        }
    }

    match (left.map(unwrap_date), right.map(unwrap_date)) {
        (Some(serde_json::Value::Number(l)), Some(serde_json::Value::Number(r))) => l
            .as_f64()
            .partial_cmp(&r.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(serde_json::Value::String(l)), Some(serde_json::Value::String(r))) => l.cmp(r),
        _ => rank(left).cmp(&rank(right)),
    }
}

/// `{"$date": "..."}` sorts as its text.
fn unwrap_date(value: &serde_json::Value) -> &serde_json::Value {
    match value {
        serde_json::Value::Object(object) if object.len() == 1 => {
            object.get("$date").unwrap_or(value)
        }
        _ => value,
    }
}

/// Keep the projected fields of a record. The identifier is always kept.
pub fn project(document: &Document, projection: &Projection) -> Document {
    if projection.fields.is_empty() {
        return document.clone();
    }
    document
        .iter()
        .filter(|(key, _)| {
            key.as_str() == SystemField::Id.name()
                || projection.fields.iter().any(|path| path.as_str() == key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
