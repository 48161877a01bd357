//! Implement the write operations.
//!
//! Input may use either naming convention; records are always written under
//! schema names.

use serde::Serialize;
use tracing::{info_span, Instrument};

use envsensor_configuration::Configuration;
use query_engine_metadata::metadata::{normalize_document, Document, LogicalField, RecordId};

use crate::envelope::Envelope;
use crate::error::Error;
use crate::query::SingleRecord;
use crate::records::RecordPatch;
use crate::state::State;
use crate::validation::{validate_new_record, validate_patch};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedRecords {
    pub records: Vec<Document>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedRecord {
    pub deleted_record: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedRecords {
    pub deleted_count: u64,
    pub requested_count: usize,
}

/// Validate and store one record.
pub async fn create_record(
    state: &State,
    input: &Document,
) -> Result<Envelope<SingleRecord>, Error> {
    let record = validate_new_record(&normalize_document(input)).map_err(Error::ValidationFailed)?;

    let record = state
        .store
        .insert(record.to_document())
        .instrument(info_span!("Insert record"))
        .await?;
    state.metrics.record_successful_mutation();

    Ok(Envelope::success(SingleRecord { record }).with_message("Record created successfully"))
}

/// Validate and store several records. Nothing is stored unless every record is valid.
pub async fn create_records(
    configuration: &Configuration,
    state: &State,
    inputs: &[Document],
) -> Result<Envelope<CreatedRecords>, Error> {
    if inputs.is_empty() {
        return Err(Error::EmptyBulkRequest);
    }
    if inputs.len() > configuration.bulk.max_records {
        return Err(Error::BulkLimitExceeded(configuration.bulk.max_records));
    }

    let mut documents = Vec::with_capacity(inputs.len());
    let mut errors = vec![];
    for (index, input) in inputs.iter().enumerate() {
        match validate_new_record(&normalize_document(input)) {
            Ok(record) => documents.push(record.to_document()),
            Err(messages) => errors.extend(
                messages
                    .into_iter()
                    .map(|message| format!("Record {}: {message}", index + 1)),
            ),
        }
    }
    if !errors.is_empty() {
        return Err(Error::BulkValidationFailed(errors));
    }

    let records = state
        .store
        .insert_many(documents)
        .instrument(info_span!("Insert records"))
        .await?;
    state.metrics.record_successful_mutation();

    let count = records.len();
    Ok(Envelope::success(CreatedRecords { records, count })
        .with_message(format!("{count} records created successfully")))
}

/// Validate and apply a partial update.
pub async fn update_record(
    state: &State,
    id: &str,
    input: &Document,
) -> Result<Envelope<SingleRecord>, Error> {
    let id = RecordId::parse(id)?;
    let patch = validate_patch(&normalize_document(input)).map_err(Error::ValidationFailed)?;

    let record = state
        .store
        .update(&id, merge_patch(&patch))
        .instrument(info_span!("Update record"))
        .await?
        .ok_or(Error::RecordNotFound(id))?;
    state.metrics.record_successful_mutation();

    Ok(Envelope::success(SingleRecord {
        record: normalize_document(&record),
    })
    .with_message("Record updated successfully"))
}

/// The patch as written: schema names carry the new values and the legacy
/// names of the same fields are removed.
fn merge_patch(patch: &RecordPatch) -> Document {
    let mut document = patch.to_document();
    let patched: Vec<LogicalField> = document
        .keys()
        .filter_map(|key| LogicalField::from_schema_name(key))
        .collect();
    for field in patched {
        document.insert(field.legacy_name().to_string(), serde_json::Value::Null);
    }
    document
}

/// Remove one record.
pub async fn delete_record(state: &State, id: &str) -> Result<Envelope<DeletedRecord>, Error> {
    let id = RecordId::parse(id)?;
    let record = state
        .store
        .delete(&id)
        .instrument(info_span!("Delete record"))
        .await?
        .ok_or(Error::RecordNotFound(id))?;
    state.metrics.record_successful_mutation();

    Ok(Envelope::success(DeletedRecord {
        deleted_record: normalize_document(&record),
    })
    .with_message("Record deleted successfully"))
}

/// Remove every listed record. Identifiers that match nothing are not an error.
pub async fn delete_records(
    state: &State,
    ids: &[String],
) -> Result<Envelope<DeletedRecords>, Error> {
    if ids.is_empty() {
        return Err(Error::EmptyIdList);
    }
    let ids = ids
        .iter()
        .map(|id| RecordId::parse(id))
        .collect::<Result<Vec<_>, _>>()?;

    let deleted_count = state
        .store
        .delete_many(&ids)
        .instrument(info_span!("Delete records"))
        .await?;
    state.metrics.record_successful_mutation();

    Ok(Envelope::success(DeletedRecords {
        deleted_count,
        requested_count: ids.len(),
    })
    .with_message(format!("{deleted_count} records deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patches_remove_legacy_aliases() {
        let patch = RecordPatch {
            temp: Some(30.0),
            city: Some("Goa".into()),
            ..RecordPatch::default()
        };
        assert_eq!(
            serde_json::Value::Object(merge_patch(&patch)),
            json!({"city": "Goa", "temp": 30.0, "City": null, "Temp (°C)": null})
        );
    }
}
