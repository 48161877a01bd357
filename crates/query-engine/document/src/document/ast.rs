//! Type definitions of a document query AST representation.

use chrono::{DateTime, Utc};

/// A complete query against a record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub projection: Projection,
    pub sort: Sort,
    pub window: Window,
}

/// A filter: the conjunction of independent condition groups.
///
/// Every filter source contributes its own group, so alternatives produced by
/// one source never leak into another.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub groups: Vec<Expression>,
}

/// A boolean condition over a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// All of the conditions hold. An empty list always holds.
    And(Vec<Expression>),
    /// At least one of the conditions holds.
    Or(Vec<Expression>),
    /// A binary comparison between a field and a value
    Comparison {
        path: FieldPath,
        operator: ComparisonOperator,
        value: Value,
    },
    /// The field equals one of the values
    In {
        path: FieldPath,
        values: Vec<Value>,
    },
    /// The field lies between the bounds, both inclusive
    Range {
        path: FieldPath,
        lower: Option<Value>,
        upper: Option<Value>,
    },
    /// The field is text containing the needle, ignoring case
    Contains { path: FieldPath, needle: String },
    /// A clause written by the caller which is passed to the store verbatim
    Raw(serde_json::Value),
}

/// The name of a field as stored in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(pub String);

/// A binary comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
}

/// Value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    DateTime(DateTime<Utc>),
}

/// The fields to return. Empty means every field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub fields: Vec<FieldPath>,
}

/// A sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub elements: Vec<SortElement>,
}

/// A single element in a sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortElement {
    pub target: SortTarget,
    pub direction: SortDirection,
}

/// The paths holding one sort key. A document is ordered by the first of
/// them it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTarget {
    pub paths: Vec<FieldPath>,
}

/// A direction for a single sort element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Skip and limit clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FieldPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        FieldPath(value.to_string())
    }
}

impl SortDirection {
    /// The store-level direction marker: 1 ascending, -1 descending.
    pub fn as_i8(self) -> i8 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}
