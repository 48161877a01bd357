//! Execute a translated query against a record store.

use tracing::{info_span, Instrument};

use query_engine_document::document::ast;
use query_engine_metadata::metadata::Document;

use crate::error::Error;
use crate::metrics;
use crate::store::RecordStore;

/// One page of matching records, and how many records match in total.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub records: Vec<Document>,
    pub total: u64,
}

/// Execute a query: fetch the requested window and count every match, both
/// from one read of the store.
pub async fn execute(
    store: &dyn RecordStore,
    metrics: &metrics::Metrics,
    query: &ast::Query,
) -> Result<QueryResult, Error> {
    let (records, total) = store
        .find_page(&query.filter, &query.projection, &query.sort, query.window)
        .instrument(info_span!("Find records"))
        .await?;

    tracing::debug!(returned = records.len(), total, "executed query");
    metrics.record_successful_query();

    Ok(QueryResult { records, total })
}
