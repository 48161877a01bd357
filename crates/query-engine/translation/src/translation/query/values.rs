//! Handle the translation of literal values.
//!
//! Every parameter arrives as text; the logical field decides what it becomes.

use chrono::{DateTime, NaiveDate, Utc};

use query_engine_document::document::ast::Value;
use query_engine_metadata::metadata::{FieldKind, LogicalField};

use crate::translation::error::Error;

/// Convert a parameter value for an equality or membership test on a field.
pub fn translate_field_value(field: LogicalField, raw: &str) -> Result<Value, Error> {
    match field.kind() {
        FieldKind::Text => Ok(Value::String(raw.to_string())),
        FieldKind::Number => parse_number(raw)
            .map(Value::Number)
            .ok_or_else(|| Error::InvalidFieldValue {
                field,
                value: raw.to_string(),
            }),
        // a sentinel such as "*" is matched as text
        FieldKind::NumberOrSentinel => Ok(parse_number(raw)
            .map_or_else(|| Value::String(raw.trim().to_string()), Value::Number)),
    }
}

/// Convert a `<field>_min` / `<field>_max` bound.
pub fn translate_range_bound(parameter: &str, raw: &str) -> Result<Value, Error> {
    parse_number(raw)
        .map(Value::Number)
        .ok_or_else(|| Error::InvalidRangeBound {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        })
}

/// Convert a `date_from` / `date_to` bound. Plain dates mean midnight UTC.
pub fn translate_date(parameter: &str, raw: &str) -> Result<Value, Error> {
    let raw_trimmed = raw.trim();
    DateTime::parse_from_rfc3339(raw_trimmed)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw_trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc())
        })
        .map(Value::DateTime)
        .ok_or_else(|| Error::InvalidDate {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        })
}

/// A finite number, or nothing.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
