//! Helpers for building document::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// A filter matching every document.
pub fn empty_filter() -> Filter {
    Filter { groups: vec![] }
}

/// A projection returning every field.
pub fn all_fields() -> Projection {
    Projection { fields: vec![] }
}

/// Unbounded window.
pub fn everything() -> Window {
    Window {
        skip: 0,
        limit: None,
    }
}

/// Sort by creation time, newest first.
pub fn default_sort() -> Sort {
    Sort {
        elements: vec![SortElement {
            target: SortTarget {
                paths: vec![FieldPath::from("createdAt")],
            },
            direction: SortDirection::Desc,
        }],
    }
}

// Conditions //

/// `path = value`
pub fn equals(path: FieldPath, value: Value) -> Expression {
    Expression::Comparison {
        path,
        operator: ComparisonOperator::Equal,
        value,
    }
}

/// `path IN values`
pub fn one_of(path: FieldPath, values: Vec<Value>) -> Expression {
    Expression::In { path, values }
}

/// `lower <= path <= upper`, either bound optional.
pub fn inclusive_range(path: FieldPath, lower: Option<Value>, upper: Option<Value>) -> Expression {
    Expression::Range { path, lower, upper }
}

/// Case insensitive substring match.
pub fn contains(path: FieldPath, needle: &str) -> Expression {
    Expression::Contains {
        path,
        needle: needle.to_string(),
    }
}

/// Build one alternative per stored name and join them into a disjunction group.
pub fn any_of<'a>(
    names: impl IntoIterator<Item = &'a str>,
    build: impl Fn(FieldPath) -> Expression,
) -> Expression {
    Expression::Or(
        names
            .into_iter()
            .map(|name| build(FieldPath::from(name)))
            .collect(),
    )
}

// Sorting //

/// A sort element over a set of alias paths.
pub fn sort_by<'a>(
    paths: impl IntoIterator<Item = &'a str>,
    direction: SortDirection,
) -> SortElement {
    SortElement {
        target: SortTarget {
            paths: paths.into_iter().map(FieldPath::from).collect(),
        },
        direction,
    }
}
