//! Validate records submitted by clients.
//!
//! Every problem is reported, not just the first, with messages meant for
//! the end user.

use query_engine_metadata::metadata::{Document, LogicalField};

use crate::records::{MonthYear, NewRecord, RecordPatch, WindSpeed};

/// Numeric readings in the order their problems are reported.
const READINGS: [LogicalField; 11] = [
    LogicalField::No,
    LogicalField::Nox,
    LogicalField::Benzene,
    LogicalField::Toluene,
    LogicalField::EthylBenzene,
    LogicalField::MpXylene,
    LogicalField::OXylene,
    LogicalField::Temperature,
    LogicalField::RelativeHumidity,
    LogicalField::SolarRadiation,
    LogicalField::RainGauge,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every field is required.
    Create,
    /// Only the fields present are checked.
    Update,
}

/// Validate a complete record. The input must already use schema names.
pub fn validate_new_record(input: &Document) -> Result<NewRecord, Vec<String>> {
    let patch = validate(input, Mode::Create)?;
    into_new_record(patch).ok_or_else(|| vec!["Record is incomplete".to_string()])
}

/// Validate a partial update. The input must already use schema names.
pub fn validate_patch(input: &Document) -> Result<RecordPatch, Vec<String>> {
    validate(input, Mode::Update)
}

fn validate(input: &Document, mode: Mode) -> Result<RecordPatch, Vec<String>> {
    let mut errors = vec![];
    let mut patch = RecordPatch {
        city: text(input, LogicalField::City, mode, &mut errors),
        ..RecordPatch::default()
    };
    let month_year = text(input, LogicalField::MonthYear, mode, &mut errors);

    for field in READINGS {
        if let Some(value) = reading(input, field, mode, &mut errors) {
            set_reading(&mut patch, field, value);
        }
    }
    patch.ws = wind_speed(input, mode, &mut errors);

    if let Some(month_year) = month_year {
        match MonthYear::parse(&month_year) {
            Some(period) => patch.month_year = Some(period),
            None => errors.push("Month-Year must be in format MMM-YY (e.g., Jan-19)".to_string()),
        }
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// A non-empty text, trimmed.
fn text(
    input: &Document,
    field: LogicalField,
    mode: Mode,
    errors: &mut Vec<String>,
) -> Option<String> {
    let name = field.display_name();
    match (input.get(field.schema_name()), mode) {
        (Some(serde_json::Value::String(text)), _) if !text.trim().is_empty() => {
            Some(text.trim().to_string())
        }
        (None, Mode::Update) => None,
        (_, Mode::Create) => {
            errors.push(format!("{name} is required and must be a non-empty string"));
            None
        }
        (Some(_), Mode::Update) => {
            errors.push(format!("{name} must be a non-empty string"));
            None
        }
    }
}

/// A number within the field's bounds.
fn reading(
    input: &Document,
    field: LogicalField,
    mode: Mode,
    errors: &mut Vec<String>,
) -> Option<f64> {
    let name = field.display_name();
    let value = match (input.get(field.schema_name()), mode) {
        (None | Some(serde_json::Value::Null), Mode::Create) => {
            errors.push(format!("{name} is required"));
            return None;
        }
        (None, Mode::Update) => return None,
        (Some(serde_json::Value::Number(number)), _) => number.as_f64(),
        (Some(_), _) => None,
    };
    let Some(value) = value.filter(|value| value.is_finite()) else {
        errors.push(format!("{name} must be a valid number"));
        return None;
    };

    let mut valid = true;
    if let Some(minimum) = field.minimum() {
        if value < minimum {
            errors.push(format!("{name} must be greater than or equal to {minimum}"));
            valid = false;
        }
    }
    if let (Some(minimum), Some(maximum)) = (field.minimum(), field.maximum()) {
        if value < minimum || value > maximum {
            errors.push(format!("{name} must be between {minimum} and {maximum}"));
            valid = false;
        }
    }
    valid.then_some(value)
}

/// A non-negative number, or a sentinel text.
fn wind_speed(input: &Document, mode: Mode, errors: &mut Vec<String>) -> Option<WindSpeed> {
    let name = LogicalField::WindSpeed.display_name();
    match (input.get(LogicalField::WindSpeed.schema_name()), mode) {
        (None | Some(serde_json::Value::Null), Mode::Create) => {
            errors.push(format!("{name} is required"));
            None
        }
        (None, Mode::Update) => None,
        (Some(serde_json::Value::Number(number)), _) => match number.as_f64() {
            Some(speed) if speed >= 0.0 => Some(WindSpeed::Measured(speed)),
            _ => {
                errors.push(format!("{name} must be a valid positive number"));
                None
            }
        },
        (Some(serde_json::Value::String(text)), _) => Some(WindSpeed::Unknown(text.trim().to_string())),
        (Some(_), _) => {
            errors.push(format!("{name} must be a number or string"));
            None
        }
    }
}

fn set_reading(patch: &mut RecordPatch, field: LogicalField, value: f64) {
    let slot = match field {
        LogicalField::No => &mut patch.no,
        LogicalField::Nox => &mut patch.nox,
        LogicalField::Benzene => &mut patch.benzene,
        LogicalField::Toluene => &mut patch.toluene,
        LogicalField::EthylBenzene => &mut patch.ethyl_ben,
        LogicalField::MpXylene => &mut patch.mp_xylene,
        LogicalField::OXylene => &mut patch.o_xylene,
        LogicalField::Temperature => &mut patch.temp,
        LogicalField::RelativeHumidity => &mut patch.rh,
        LogicalField::SolarRadiation => &mut patch.sr,
        LogicalField::RainGauge => &mut patch.rg,
        LogicalField::City | LogicalField::MonthYear | LogicalField::WindSpeed => return,
    };
    *slot = Some(value);
}

fn into_new_record(patch: RecordPatch) -> Option<NewRecord> {
    Some(NewRecord {
        city: patch.city?,
        month_year: patch.month_year?,
        no: patch.no?,
        nox: patch.nox?,
        benzene: patch.benzene?,
        toluene: patch.toluene?,
        ethyl_ben: patch.ethyl_ben?,
        mp_xylene: patch.mp_xylene?,
        o_xylene: patch.o_xylene?,
        ws: patch.ws?,
        temp: patch.temp?,
        rh: patch.rh?,
        sr: patch.sr?,
        rg: patch.rg?,
    })
}
