//! Request parameters as received from the transport layer.

use std::collections::BTreeMap;

pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";
pub const SORT: &str = "sort";
pub const FIELDS: &str = "fields";
pub const SEARCH: &str = "search";
pub const DATE_FROM: &str = "date_from";
pub const DATE_TO: &str = "date_to";
pub const OR: &str = "$or";
pub const AND: &str = "$and";

const RESERVED: [&str; 9] = [PAGE, LIMIT, SORT, FIELDS, SEARCH, DATE_FROM, DATE_TO, OR, AND];

/// Suffix of a range lower bound parameter, as in `no_min`.
pub const MIN_SUFFIX: &str = "_min";
/// Suffix of a range upper bound parameter, as in `no_max`.
pub const MAX_SUFFIX: &str = "_max";

/// A parameter given once, or several times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// The first value given.
    pub fn first(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Many(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Single(value) => vec![value.as_str()],
            ParamValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(first) => {
                *self = ParamValue::Many(vec![std::mem::take(first), value]);
            }
            ParamValue::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// The named parameters of one request, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        QueryParams::default()
    }

    /// Collect `(name, value)` pairs. A name given more than once becomes a list.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = QueryParams::new();
        for (name, value) in pairs {
            params.append(name.into(), value.into());
        }
        params
    }

    /// Parse a URL encoded query string such as `city=Pune&no_min=5`.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    fn append(&mut self, name: String, value: String) {
        match self.0.get_mut(&name) {
            Some(existing) => existing.push(value),
            None => {
                self.0.insert(name, ParamValue::Single(value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// The first value of a parameter, ignoring blank values.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(ParamValue::first)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Control parameters which never name a field.
pub fn is_reserved(name: &str) -> bool {
    name.starts_with('_') || RESERVED.contains(&name)
}
