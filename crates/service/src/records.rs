//! Typed records as accepted by write operations.
//!
//! Records are written under schema names only.

use serde::Serialize;

use query_engine_metadata::metadata::Document;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A reporting period such as `Jan-19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct MonthYear {
    /// 1 to 12
    month: u8,
    /// two digit year
    year: u8,
}

impl MonthYear {
    /// Parse the `MMM-YY` format. Month abbreviations are case sensitive.
    pub fn parse(text: &str) -> Option<Self> {
        let (month, year) = text.split_once('-')?;
        let month = MONTHS.iter().position(|abbreviation| *abbreviation == month)?;
        if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(MonthYear {
            month: u8::try_from(month + 1).ok()?,
            year: year.parse().ok()?,
        })
    }
}

impl std::fmt::Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let month = MONTHS[usize::from(self.month - 1)];
        write!(f, "{month}-{:02}", self.year)
    }
}

impl From<MonthYear> for String {
    fn from(value: MonthYear) -> Self {
        value.to_string()
    }
}

/// A wind speed reading. Stations report `*` when the reading is unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WindSpeed {
    Measured(f64),
    Unknown(String),
}

/// A complete record submitted for creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub city: String,
    pub month_year: MonthYear,
    pub no: f64,
    pub nox: f64,
    pub benzene: f64,
    pub toluene: f64,
    pub ethyl_ben: f64,
    pub mp_xylene: f64,
    pub o_xylene: f64,
    pub ws: WindSpeed,
    pub temp: f64,
    pub rh: f64,
    pub sr: f64,
    pub rg: f64,
}

/// The fields of a record to change. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_year: Option<MonthYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nox: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benzene: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toluene: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethyl_ben: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp_xylene: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o_xylene: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws: Option<WindSpeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rg: Option<f64>,
}

impl NewRecord {
    pub fn to_document(&self) -> Document {
        to_document(self)
    }
}

impl RecordPatch {
    pub fn to_document(&self) -> Document {
        to_document(self)
    }
}

fn to_document(value: &impl Serialize) -> Document {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(document)) => document,
        // every field serializes to a JSON scalar
        _ => Document::new(),
    }
}
