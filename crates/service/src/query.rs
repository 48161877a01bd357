//! Implement the read operations.

use serde::Serialize;
use tracing::{info_span, Instrument};

use envsensor_configuration::Configuration;
use query_engine_execution::query::execute;
use query_engine_metadata::metadata::{normalize_document, Document, RecordId};
use query_engine_translation::translation::helpers::Warning;
use query_engine_translation::translation::params::QueryParams;
use query_engine_translation::translation::query::{translate, PaginationInfo};

use crate::envelope::Envelope;
use crate::error::Error;
use crate::state::State;

/// One page of records, with the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPage {
    pub records: Vec<Document>,
    pub pagination: PaginationInfo,
    pub query_applied: serde_json::Value,
    pub sort_applied: serde_json::Value,
    /// Parameters that were left out of the query.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// A single record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleRecord {
    pub record: Document,
}

/// List the records matching the request parameters.
pub async fn list_records(
    configuration: &Configuration,
    state: &State,
    params: &QueryParams,
) -> Result<Envelope<RecordPage>, Error> {
    let plan = translate(&configuration.metadata, params).map_err(|err| {
        state.metrics.record_rejected_query();
        err
    })?;
    let dropped = plan
        .warnings
        .iter()
        .filter(|warning| matches!(warning, Warning::DroppedCondition { .. }))
        .count();
    state.metrics.record_dropped_conditions(dropped);

    let result = execute(state.store.as_ref(), &state.metrics, &plan.query)
        .instrument(info_span!("Execute query"))
        .await?;

    Ok(Envelope::success(RecordPage {
        records: result.records.iter().map(normalize_document).collect(),
        pagination: PaginationInfo::new(plan.page.number, plan.page.limit, result.total),
        query_applied: plan.query.filter.to_document(),
        sort_applied: plan.query.sort.to_document(),
        warnings: plan.warnings.iter().map(ToString::to_string).collect(),
    }))
}

/// Fetch one record by its identifier.
pub async fn get_record(state: &State, id: &str) -> Result<Envelope<SingleRecord>, Error> {
    let id = RecordId::parse(id)?;
    let record = state
        .store
        .find_by_id(&id)
        .instrument(info_span!("Find record"))
        .await?
        .ok_or(Error::RecordNotFound(id))?;
    Ok(Envelope::success(SingleRecord {
        record: normalize_document(&record),
    }))
}
