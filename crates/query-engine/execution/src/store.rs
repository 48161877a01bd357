//! The contract between the query engine and a record store.

use async_trait::async_trait;

use query_engine_document::document::ast::{Filter, Projection, Sort, Window};
use query_engine_metadata::metadata::{Document, RecordId};

use crate::error::Error;

/// A collection of records which can be queried with the document AST.
///
/// Stores assign `_id`, `createdAt` and `updatedAt`; callers never set them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Matching records, ordered and windowed, with only the projected fields.
    async fn find(
        &self,
        filter: &Filter,
        projection: &Projection,
        sort: &Sort,
        window: Window,
    ) -> Result<Vec<Document>, Error>;

    /// Number of records matching the filter, regardless of any window.
    async fn count(&self, filter: &Filter) -> Result<u64, Error>;

    /// `find` and `count` over the same snapshot of the store, so the total
    /// always agrees with the returned window.
    async fn find_page(
        &self,
        filter: &Filter,
        projection: &Projection,
        sort: &Sort,
        window: Window,
    ) -> Result<(Vec<Document>, u64), Error>;

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Document>, Error>;

    /// Store a new record and return it as stored.
    async fn insert(&self, document: Document) -> Result<Document, Error>;

    /// Store several records at once. Either all are stored or none.
    async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<Document>, Error>;

    /// Apply a merge patch: `null` removes a key, any other value replaces it.
    /// Returns the updated record, or `None` when there is no such record.
    async fn update(&self, id: &RecordId, patch: Document) -> Result<Option<Document>, Error>;

    /// Remove a record and return it.
    async fn delete(&self, id: &RecordId) -> Result<Option<Document>, Error>;

    /// Remove every listed record and return how many existed.
    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, Error>;
}
