//! Parse filter clauses written by callers into the AST.
//!
//! Only the subset of the store's query language the engine can evaluate is
//! accepted: `$and`, `$or`, field equality and the comparison operators.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ast::*;

/// A clause we cannot understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected a JSON object, found {0}")]
    NotAnObject(String),
    #[error("'{0}' expects an array of clauses")]
    NotAnArray(String),
    #[error("operator '{0}' is not supported")]
    UnsupportedOperator(String),
    #[error("the value for '{0}' is not supported")]
    UnsupportedValue(String),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

impl Expression {
    /// Parse a single clause such as `{"city": "Delhi"}` or
    /// `{"$or": [{"no": {"$gt": 5}}, {"temp": {"$lt": 0}}]}`.
    pub fn from_document(document: &serde_json::Value) -> Result<Expression, ParseError> {
        let serde_json::Value::Object(clause) = document else {
            return Err(ParseError::NotAnObject(document.to_string()));
        };

        let mut parts = clause
            .iter()
            .map(|(key, value)| match key.as_str() {
                "$and" => Ok(Expression::And(parse_clauses(key, value)?)),
                "$or" => Ok(Expression::Or(parse_clauses(key, value)?)),
                operator if operator.starts_with('$') => {
                    Err(ParseError::UnsupportedOperator(operator.to_string()))
                }
                path => parse_field_condition(FieldPath::from(path), value),
            })
            .collect::<Result<Vec<Expression>, ParseError>>()?;

        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Expression::And(parts))
        }
    }
}

/// Parse a JSON array of clauses, as given to `$and` and `$or`.
pub fn parse_clauses(
    operator: &str,
    value: &serde_json::Value,
) -> Result<Vec<Expression>, ParseError> {
    match value {
        serde_json::Value::Array(clauses) => clauses.iter().map(Expression::from_document).collect(),
        _ => Err(ParseError::NotAnArray(operator.to_string())),
    }
}

fn parse_field_condition(
    path: FieldPath,
    value: &serde_json::Value,
) -> Result<Expression, ParseError> {
    match value {
        serde_json::Value::Object(operators) if !is_date(operators) => {
            let mut conditions = operators
                .iter()
                .map(|(operator, operand)| {
                    let operator = match operator.as_str() {
                        "$eq" => ComparisonOperator::Equal,
                        "$ne" => ComparisonOperator::NotEqual,
                        "$lt" => ComparisonOperator::LessThan,
                        "$lte" => ComparisonOperator::LessThanOrEqualTo,
                        "$gt" => ComparisonOperator::GreaterThan,
                        "$gte" => ComparisonOperator::GreaterThanOrEqualTo,
                        "$in" => {
                            return match operand {
                                serde_json::Value::Array(values) => Ok(Expression::In {
                                    path: path.clone(),
                                    values: values
                                        .iter()
                                        .map(|value| parse_scalar(&path, value))
                                        .collect::<Result<_, _>>()?,
                                }),
                                _ => Err(ParseError::NotAnArray("$in".to_string())),
                            }
                        }
                        other => return Err(ParseError::UnsupportedOperator(other.to_string())),
                    };
                    Ok(Expression::Comparison {
                        path: path.clone(),
                        operator,
                        value: parse_scalar(&path, operand)?,
                    })
                })
                .collect::<Result<Vec<Expression>, ParseError>>()?;

            match conditions.len() {
                0 => Err(ParseError::UnsupportedValue(path.0)),
                1 => Ok(conditions.remove(0)),
                _ => Ok(Expression::And(conditions)),
            }
        }
        scalar => Ok(Expression::Comparison {
            operator: ComparisonOperator::Equal,
            value: parse_scalar(&path, scalar)?,
            path,
        }),
    }
}

/// Convert a JSON scalar, or an extended JSON `{"$date": ..}`, into a value.
pub fn parse_scalar(path: &FieldPath, value: &serde_json::Value) -> Result<Value, ParseError> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| ParseError::UnsupportedValue(path.0.clone())),
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Object(object) if is_date(object) => match object.get("$date") {
            Some(serde_json::Value::String(date)) => DateTime::parse_from_rfc3339(date)
                .map(|timestamp| Value::DateTime(timestamp.with_timezone(&Utc)))
                .map_err(|_| ParseError::InvalidDate(date.clone())),
            other => Err(ParseError::InvalidDate(
                other.map(ToString::to_string).unwrap_or_default(),
            )),
        },
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
            Err(ParseError::UnsupportedValue(path.0.clone()))
        }
    }
}

fn is_date(object: &serde_json::Map<String, serde_json::Value>) -> bool {
    object.len() == 1 && object.contains_key("$date")
}
