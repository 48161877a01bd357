//! A record store kept in memory, optionally seeded from a JSON file.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::RwLock;

use query_engine_document::document::ast::{Filter, Projection, Sort, Window};
use query_engine_metadata::metadata::{Document, RecordId, SystemField};

use crate::error::Error;
use crate::evaluate;
use crate::store::RecordStore;

/// Records held in insertion order behind an async lock. Readers share the
/// lock, writers take it exclusively.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Seed the store with documents as they were exported, in either naming
    /// convention. Documents without an identifier get a fresh one.
    pub fn with_documents(documents: Vec<Document>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        let mut seeded = Vec::with_capacity(documents.len());
        for mut document in documents {
            let id = match stored_id(&document) {
                Some(id) => id,
                None => RecordId::generate().to_string(),
            };
            if !seen.insert(id.clone()) {
                return Err(Error::DuplicateId(id));
            }
            document.insert(SystemField::Id.name().to_string(), id.into());
            seeded.push(document);
        }
        Ok(InMemoryStore {
            documents: RwLock::new(seeded),
        })
    }

    /// Load a JSON array of records from a file.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&contents).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let documents = values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::Object(document) => Ok(document),
                _ => Err(Error::InvalidDataFile {
                    path: path.to_path_buf(),
                }),
            })
            .collect::<Result<Vec<_>, Error>>()?;

        tracing::info!(path = %path.display(), records = documents.len(), "loaded records");
        Self::with_documents(documents)
    }

    /// Number of records held, for diagnostics.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find(
        &self,
        filter: &Filter,
        projection: &Projection,
        sort: &Sort,
        window: Window,
    ) -> Result<Vec<Document>, Error> {
        let documents = self.documents.read().await;
        let matching = matching(&documents, filter, sort)?;
        Ok(select(&matching, projection, window))
    }

    async fn count(&self, filter: &Filter) -> Result<u64, Error> {
        let documents = self.documents.read().await;
        let mut count = 0;
        for document in documents.iter() {
            if evaluate::matches_filter(filter, document)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_page(
        &self,
        filter: &Filter,
        projection: &Projection,
        sort: &Sort,
        window: Window,
    ) -> Result<(Vec<Document>, u64), Error> {
        let documents = self.documents.read().await;
        let matching = matching(&documents, filter, sort)?;
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        Ok((select(&matching, projection, window), total))
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Document>, Error> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|document| has_id(document, id))
            .cloned())
    }

    async fn insert(&self, document: Document) -> Result<Document, Error> {
        let mut documents = self.documents.write().await;
        let document = stamp_new(document, &documents)?;
        documents.push(document.clone());
        Ok(document)
    }

    async fn insert_many(&self, new_documents: Vec<Document>) -> Result<Vec<Document>, Error> {
        let mut documents = self.documents.write().await;
        let mut stamped: Vec<Document> = Vec::with_capacity(new_documents.len());
        for document in new_documents {
            let document = stamp_new(document, &documents)?;
            if let Some(id) = stored_id(&document) {
                if stamped.iter().any(|other| stored_id(other).as_ref() == Some(&id)) {
                    return Err(Error::DuplicateId(id));
                }
            }
            stamped.push(document);
        }
        documents.extend(stamped.iter().cloned());
        Ok(stamped)
    }

    async fn update(&self, id: &RecordId, patch: Document) -> Result<Option<Document>, Error> {
        let mut documents = self.documents.write().await;
        let Some(document) = documents.iter_mut().find(|document| has_id(document, id)) else {
            return Ok(None);
        };

        for (key, value) in patch {
            if key == SystemField::Id.name() || key == SystemField::CreatedAt.name() {
                continue;
            }
            if value.is_null() {
                document.remove(&key);
            } else {
                document.insert(key, value);
            }
        }
        document.insert(SystemField::UpdatedAt.name().to_string(), now().into());
        Ok(Some(document.clone()))
    }

    async fn delete(&self, id: &RecordId) -> Result<Option<Document>, Error> {
        let mut documents = self.documents.write().await;
        let position = documents.iter().position(|document| has_id(document, id));
        Ok(position.map(|index| documents.remove(index)))
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, Error> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|document| !ids.iter().any(|id| has_id(document, id)));
        Ok((before - documents.len()) as u64)
    }
}

/// Assign the identifier and timestamps of a new record.
fn stamp_new(mut document: Document, existing: &[Document]) -> Result<Document, Error> {
    let id = match stored_id(&document) {
        Some(id) if existing.iter().any(|other| stored_id(other).as_ref() == Some(&id)) => {
            return Err(Error::DuplicateId(id));
        }
        Some(id) => id,
        None => RecordId::generate().to_string(),
    };
    let timestamp = now();
    document.insert(SystemField::Id.name().to_string(), id.into());
    document.insert(SystemField::CreatedAt.name().to_string(), timestamp.clone().into());
    document.insert(SystemField::UpdatedAt.name().to_string(), timestamp.into());
    Ok(document)
}

/// The identifier of a stored record, as text or as `{"$oid": "..."}`.
fn stored_id(document: &Document) -> Option<String> {
    match document.get(SystemField::Id.name())? {
        serde_json::Value::String(id) => Some(id.to_ascii_lowercase()),
        serde_json::Value::Object(object) => object
            .get("$oid")
            .and_then(serde_json::Value::as_str)
            .map(str::to_ascii_lowercase),
        _ => None,
    }
}

fn has_id(document: &Document, id: &RecordId) -> bool {
    stored_id(document).as_deref() == Some(id.as_str())
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Every document satisfying the filter, in sort order.
fn matching(documents: &[Document], filter: &Filter, sort: &Sort) -> Result<Vec<Document>, Error> {
    let mut matching = vec![];
    for document in documents {
        if evaluate::matches_filter(filter, document)? {
            matching.push(document.clone());
        }
    }
    evaluate::sort_documents(&mut matching, sort);
    Ok(matching)
}

fn select(matching: &[Document], projection: &Projection, window: Window) -> Vec<Document> {
    let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
    let take = window
        .limit
        .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
    matching
        .iter()
        .skip(skip)
        .take(take)
        .map(|document| evaluate::project(document, projection))
        .collect()
}
