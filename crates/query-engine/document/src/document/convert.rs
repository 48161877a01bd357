//! Render a document query AST to store-level JSON documents.

use chrono::SecondsFormat;
use serde_json::{json, Map};

use super::ast::*;

// Convert to JSON documents

impl Query {
    /// A JSON view of the whole query, as handed to a document store.
    pub fn to_document(&self) -> serde_json::Value {
        json!({
            "filter": self.filter.to_document(),
            "projection": self.projection.to_document(),
            "sort": self.sort.to_document(),
            "skip": self.window.skip,
            "limit": self.window.limit,
        })
    }
}

impl Filter {
    pub fn to_document(&self) -> serde_json::Value {
        match self.groups.as_slice() {
            [] => json!({}),
            [group] => group.to_document(),
            groups => json!({
                "$and": groups.iter().map(Expression::to_document).collect::<Vec<_>>()
            }),
        }
    }
}

impl Expression {
    pub fn to_document(&self) -> serde_json::Value {
        match self {
            Expression::And(expressions) if expressions.is_empty() => json!({}),
            Expression::And(expressions) => json!({
                "$and": expressions.iter().map(Expression::to_document).collect::<Vec<_>>()
            }),
            Expression::Or(expressions) => json!({
                "$or": expressions.iter().map(Expression::to_document).collect::<Vec<_>>()
            }),
            Expression::Comparison {
                path,
                operator: ComparisonOperator::Equal,
                value,
            } => field(path, value.to_json()),
            Expression::Comparison {
                path,
                operator,
                value,
            } => field(path, json!({ operator.to_operator(): value.to_json() })),
            Expression::In { path, values } => field(
                path,
                json!({ "$in": values.iter().map(Value::to_json).collect::<Vec<_>>() }),
            ),
            Expression::Range { path, lower, upper } => {
                let mut bounds = Map::new();
                if let Some(lower) = lower {
                    bounds.insert("$gte".to_string(), lower.to_json());
                }
                if let Some(upper) = upper {
                    bounds.insert("$lte".to_string(), upper.to_json());
                }
                field(path, serde_json::Value::Object(bounds))
            }
            Expression::Contains { path, needle } => field(
                path,
                json!({ "$regex": escape_regex(needle), "$options": "i" }),
            ),
            Expression::Raw(document) => document.clone(),
        }
    }
}

impl ComparisonOperator {
    pub fn to_operator(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "$eq",
            ComparisonOperator::NotEqual => "$ne",
            ComparisonOperator::LessThan => "$lt",
            ComparisonOperator::LessThanOrEqualTo => "$lte",
            ComparisonOperator::GreaterThan => "$gt",
            ComparisonOperator::GreaterThanOrEqualTo => "$gte",
        }
    }
}

impl Value {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(timestamp) => {
                json!({ "$date": timestamp.to_rfc3339_opts(SecondsFormat::Millis, true) })
            }
        }
    }
}

impl Sort {
    /// Every path of every element, in order, with the element's direction.
    pub fn to_document(&self) -> serde_json::Value {
        let mut sort = Map::new();
        for element in &self.elements {
            for path in &element.target.paths {
                sort.insert(path.0.clone(), json!(element.direction.as_i8()));
            }
        }
        serde_json::Value::Object(sort)
    }
}

impl Projection {
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|path| (path.0.clone(), json!(1)))
                .collect(),
        )
    }
}

fn field(path: &FieldPath, condition: serde_json::Value) -> serde_json::Value {
    let mut document = Map::new();
    document.insert(path.0.clone(), condition);
    serde_json::Value::Object(document)
}

/// Integral values render as integers, so bounds read `5` rather than `5.0`.
#[allow(clippy::cast_possible_truncation)]
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        json!(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Escape regular expression metacharacters so the text matches literally.
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::super::helpers;
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn empty_filter_renders_empty_document() {
        assert_eq!(helpers::empty_filter().to_document(), json!({}));
    }

    #[test]
    fn single_group_is_not_wrapped() {
        let filter = Filter {
            groups: vec![helpers::any_of(["city", "City"], |path| {
                helpers::equals(path, Value::String("Pune".into()))
            })],
        };
        assert_eq!(
            filter.to_document(),
            json!({"$or": [{"city": "Pune"}, {"City": "Pune"}]})
        );
    }

    #[test]
    fn several_groups_are_anded() {
        let filter = Filter {
            groups: vec![
                helpers::equals(FieldPath::from("city"), Value::String("Pune".into())),
                helpers::inclusive_range(
                    FieldPath::from("no"),
                    Some(Value::Number(5.0)),
                    Some(Value::Number(20.5)),
                ),
            ],
        };
        assert_eq!(
            filter.to_document(),
            json!({"$and": [{"city": "Pune"}, {"no": {"$gte": 5, "$lte": 20.5}}]})
        );
    }

    #[test]
    fn renders_operators() {
        let expression = Expression::Comparison {
            path: FieldPath::from("temp"),
            operator: ComparisonOperator::LessThan,
            value: Value::Number(-2.5),
        };
        assert_eq!(expression.to_document(), json!({"temp": {"$lt": -2.5}}));

        let expression = helpers::one_of(
            FieldPath::from("city"),
            vec![Value::String("Pune".into()), Value::String("Delhi".into())],
        );
        assert_eq!(
            expression.to_document(),
            json!({"city": {"$in": ["Pune", "Delhi"]}})
        );
    }

    #[test]
    fn renders_timestamps_as_dates() {
        let timestamp = chrono::DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let expression = helpers::inclusive_range(
            FieldPath::from("createdAt"),
            Some(Value::DateTime(timestamp)),
            None,
        );
        assert_eq!(
            expression.to_document(),
            json!({"createdAt": {"$gte": {"$date": "2024-03-01T00:00:00.000Z"}}})
        );
    }

    #[test]
    fn search_text_is_literal() {
        let expression = helpers::contains(FieldPath::from("city"), "a.b(c");
        assert_eq!(
            expression.to_document(),
            json!({"city": {"$regex": "a\\.b\\(c", "$options": "i"}})
        );
    }

    #[test]
    fn sort_keeps_element_order() {
        let sort = Sort {
            elements: vec![
                helpers::sort_by(["temp", "Temp (°C)"], SortDirection::Desc),
                helpers::sort_by(["city", "City"], SortDirection::Asc),
            ],
        };
        let rendered = serde_json::to_string(&sort.to_document()).unwrap();
        assert_eq!(
            rendered,
            r#"{"temp":-1,"Temp (°C)":-1,"city":1,"City":1}"#
        );
    }

    #[test]
    fn raw_clauses_are_verbatim() {
        let raw = json!({"city": {"$in": ["Delhi"]}, "extra": [1, 2]});
        assert_eq!(Expression::Raw(raw.clone()).to_document(), raw);
    }
}
