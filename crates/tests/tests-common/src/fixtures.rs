//! Sample records in both naming conventions.

use std::io::Write;

use query_engine_metadata::metadata::Document;
use serde_json::json;

const SAMPLE_RECORDS: &str = include_str!("../../../../static/records.json");

/// Identifiers of the sample records, in file order.
pub const SAMPLE_IDS: [&str; 6] = [
    "650000000000000000000001",
    "650000000000000000000002",
    "650000000000000000000003",
    "650000000000000000000004",
    "650000000000000000000005",
    "650000000000000000000006",
];

/// Six records: Pune and Mumbai under schema names, Delhi and one Pune
/// reading under legacy names. Delhi's first reading has an unknown wind speed.
pub fn sample_documents() -> Vec<Document> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(SAMPLE_RECORDS).expect("static/records.json is valid JSON");
    values.into_iter().map(document).collect()
}

/// Unwrap a JSON object.
pub fn document(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(document) => document,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A complete, valid record as a client would submit it.
pub fn new_record(city: &str, month_year: &str, no: f64) -> Document {
    document(json!({
        "city": city,
        "monthYear": month_year,
        "no": no,
        "nox": 12,
        "benzene": 0.8,
        "toluene": 2.5,
        "ethylBen": 0.4,
        "mpXylene": 0.9,
        "oXylene": 0.5,
        "ws": 2.2,
        "temp": 21.5,
        "rh": 55,
        "sr": 150,
        "rg": 0
    }))
}

/// Write records to a temporary JSON file, removed when dropped.
pub fn write_data_file(documents: &[Document]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temporary data file");
    serde_json::to_writer_pretty(&mut file, documents).expect("write temporary data file");
    file.flush().expect("flush temporary data file");
    file
}
