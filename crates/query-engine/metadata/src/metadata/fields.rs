//! The logical fields of an environmental record and the names they are stored under.

use enum_iterator::Sequence;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A conceptual attribute of a record, independent of its stored name.
///
/// Serialized as its schema name, which is also the name clients use in
/// query parameters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Sequence,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum LogicalField {
    #[serde(rename = "city")]
    City,
    #[serde(rename = "monthYear")]
    MonthYear,
    #[serde(rename = "no")]
    No,
    #[serde(rename = "nox")]
    Nox,
    #[serde(rename = "benzene")]
    Benzene,
    #[serde(rename = "toluene")]
    Toluene,
    #[serde(rename = "ethylBen")]
    EthylBenzene,
    #[serde(rename = "mpXylene")]
    MpXylene,
    #[serde(rename = "oXylene")]
    OXylene,
    #[serde(rename = "ws")]
    WindSpeed,
    #[serde(rename = "temp")]
    Temperature,
    #[serde(rename = "rh")]
    RelativeHumidity,
    #[serde(rename = "sr")]
    SolarRadiation,
    #[serde(rename = "rg")]
    RainGauge,
}

/// The kind of value a logical field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// A number, or a sentinel text such as `*` when the reading is unknown.
    NumberOrSentinel,
}

impl LogicalField {
    /// The name used by structured API writes.
    pub fn schema_name(self) -> &'static str {
        match self {
            LogicalField::City => "city",
            LogicalField::MonthYear => "monthYear",
            LogicalField::No => "no",
            LogicalField::Nox => "nox",
            LogicalField::Benzene => "benzene",
            LogicalField::Toluene => "toluene",
            LogicalField::EthylBenzene => "ethylBen",
            LogicalField::MpXylene => "mpXylene",
            LogicalField::OXylene => "oXylene",
            LogicalField::WindSpeed => "ws",
            LogicalField::Temperature => "temp",
            LogicalField::RelativeHumidity => "rh",
            LogicalField::SolarRadiation => "sr",
            LogicalField::RainGauge => "rg",
        }
    }

    /// The human readable label used by bulk CSV imports.
    pub fn legacy_name(self) -> &'static str {
        match self {
            LogicalField::City => "City",
            LogicalField::MonthYear => "Month - Year",
            LogicalField::No => "NO (µg/m3)",
            LogicalField::Nox => "NOX (ppb)",
            LogicalField::Benzene => "Benzene (µg/m3)",
            LogicalField::Toluene => "Toluene (µg/m3)",
            LogicalField::EthylBenzene => "Ethyl Ben (µg/m3)",
            LogicalField::MpXylene => "MP Xylene (µg/m3)",
            LogicalField::OXylene => "O xylene (µg/m3)",
            LogicalField::WindSpeed => "WS (m/s)",
            LogicalField::Temperature => "Temp (°C)",
            LogicalField::RelativeHumidity => "RH (%)",
            LogicalField::SolarRadiation => "SR (W/m2)",
            LogicalField::RainGauge => "RG (mm)",
        }
    }

    /// Name used in validation messages.
    pub fn display_name(self) -> &'static str {
        match self {
            LogicalField::City => "City",
            LogicalField::MonthYear => "Month-Year",
            LogicalField::No => "NO",
            LogicalField::Nox => "NOX",
            LogicalField::Benzene => "Benzene",
            LogicalField::Toluene => "Toluene",
            LogicalField::EthylBenzene => "Ethyl Benzene",
            LogicalField::MpXylene => "MP Xylene",
            LogicalField::OXylene => "O Xylene",
            LogicalField::WindSpeed => "Wind Speed (WS)",
            LogicalField::Temperature => "Temperature",
            LogicalField::RelativeHumidity => "Relative Humidity",
            LogicalField::SolarRadiation => "Solar Radiation",
            LogicalField::RainGauge => "Rain Gauge",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            LogicalField::City | LogicalField::MonthYear => FieldKind::Text,
            LogicalField::WindSpeed => FieldKind::NumberOrSentinel,
            _ => FieldKind::Number,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() != FieldKind::Text
    }

    /// Inclusive lower bound of valid values, if any.
    pub fn minimum(self) -> Option<f64> {
        match self.kind() {
            FieldKind::Text => None,
            _ if self == LogicalField::Temperature => None,
            _ => Some(0.0),
        }
    }

    /// Inclusive upper bound of valid values, if any.
    pub fn maximum(self) -> Option<f64> {
        match self {
            LogicalField::RelativeHumidity => Some(100.0),
            _ => None,
        }
    }

    /// Both stored names, schema name first.
    pub fn stored_names(self) -> [&'static str; 2] {
        [self.schema_name(), self.legacy_name()]
    }

    /// Look up a field by the name clients use in query parameters.
    pub fn from_schema_name(name: &str) -> Option<Self> {
        enum_iterator::all::<LogicalField>().find(|field| field.schema_name() == name)
    }

    pub fn from_legacy_name(name: &str) -> Option<Self> {
        enum_iterator::all::<LogicalField>().find(|field| field.legacy_name() == name)
    }

    /// Every logical field, in declaration order.
    pub fn all() -> impl Iterator<Item = LogicalField> {
        enum_iterator::all::<LogicalField>()
    }

    /// Every field accepting `_min` / `_max` range bounds.
    pub fn numeric() -> impl Iterator<Item = LogicalField> {
        Self::all().filter(|field| field.is_numeric())
    }
}

impl std::fmt::Display for LogicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.schema_name())
    }
}

/// Fields managed by the store rather than the client. They have a single name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum SystemField {
    Id,
    CreatedAt,
    UpdatedAt,
}

impl SystemField {
    pub fn name(self) -> &'static str {
        match self {
            SystemField::Id => "_id",
            SystemField::CreatedAt => "createdAt",
            SystemField::UpdatedAt => "updatedAt",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        enum_iterator::all::<SystemField>().find(|field| field.name() == name)
    }
}
