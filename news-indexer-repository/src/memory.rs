//! In-memory search engine.
//!
//! A process-local `SearchEngine` used to exercise the index client without a
//! cluster. It follows the remote engine's observable behavior closely enough
//! for tests: gets are realtime, searches only see documents written before
//! the last `refresh`, and errors use the same variants.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchEngine;
use crate::types::{SearchHit, SearchRequest, SearchResponse};

/// Top-level keys accepted in a create-index body.
const INDEX_BODY_KEYS: [&str; 3] = ["settings", "mappings", "aliases"];

type DocumentKey = (String, String);

#[derive(Debug, Default)]
struct StoredIndex {
    mappings: Value,
    documents: BTreeMap<DocumentKey, String>,
    searchable: BTreeMap<DocumentKey, String>,
}

/// In-memory `SearchEngine` implementation.
#[derive(Debug, Default)]
pub struct InMemoryEngine {
    indices: RwLock<HashMap<String, StoredIndex>>,
    auto_create_index: bool,
    unavailable: AtomicBool,
}

impl InMemoryEngine {
    /// Create an empty engine. Writes to a missing index fail with
    /// `IndexNotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine that creates missing indices on first write,
    /// as the remote engine does with its default cluster settings.
    pub fn with_auto_create_index() -> Self {
        Self {
            auto_create_index: true,
            ..Self::default()
        }
    }

    /// Simulate losing the connection: while set, every call fails with
    /// `EngineUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of documents stored in an index, visible to search or not.
    pub async fn document_count(&self, index: &str) -> Option<usize> {
        self.indices
            .read()
            .await
            .get(index)
            .map(|stored| stored.documents.len())
    }

    fn check_available(&self) -> Result<(), SearchIndexError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SearchIndexError::unavailable("in-memory engine is offline"));
        }
        Ok(())
    }
}

fn parse_index_body(body: &str) -> Result<Value, SearchIndexError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|e| SearchIndexError::schema_invalid(e.to_string()))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| SearchIndexError::schema_invalid("index body must be an object"))?;

    if let Some(key) = object
        .keys()
        .find(|key| !INDEX_BODY_KEYS.contains(&key.as_str()))
    {
        return Err(SearchIndexError::schema_invalid(format!(
            "unknown key [{}] for create index",
            key
        )));
    }

    Ok(object.get("mappings").cloned().unwrap_or_else(|| json!({})))
}

#[async_trait]
impl SearchEngine for InMemoryEngine {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        self.check_available()?;
        Ok(self.indices.read().await.contains_key(index))
    }

    async fn create_index(&self, index: &str, body: &str) -> Result<(), SearchIndexError> {
        self.check_available()?;
        let mappings = parse_index_body(body)?;

        let mut indices = self.indices.write().await;
        if indices.contains_key(index) {
            return Err(SearchIndexError::index_already_exists(index));
        }
        indices.insert(
            index.to_string(),
            StoredIndex {
                mappings,
                ..StoredIndex::default()
            },
        );
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.check_available()?;
        self.indices
            .write()
            .await
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| SearchIndexError::index_not_found(index))
    }

    async fn upsert_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &str,
    ) -> Result<(), SearchIndexError> {
        self.check_available()?;
        let parsed: Value = serde_json::from_str(body)
            .map_err(|e| SearchIndexError::document_rejected(e.to_string()))?;
        if !parsed.is_object() {
            return Err(SearchIndexError::document_rejected(
                "document body must be an object",
            ));
        }

        let mut indices = self.indices.write().await;
        if !self.auto_create_index && !indices.contains_key(index) {
            return Err(SearchIndexError::index_not_found(index));
        }
        let stored = indices
            .entry(index.to_string())
            .or_insert_with(|| StoredIndex {
                mappings: json!({}),
                ..StoredIndex::default()
            });
        stored
            .documents
            .insert((doc_type.to_string(), id.to_string()), body.to_string());
        Ok(())
    }

    async fn get_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<Vec<u8>, SearchIndexError> {
        self.check_available()?;
        let indices = self.indices.read().await;
        let stored = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        stored
            .documents
            .get(&(doc_type.to_string(), id.to_string()))
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| SearchIndexError::document_not_found(index, doc_type, id))
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
        self.check_available()?;
        let mut indices = self.indices.write().await;
        let stored = indices
            .get_mut(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;
        stored.searchable = stored.documents.clone();
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchIndexError> {
        self.check_available()?;
        let indices = self.indices.read().await;
        let stored = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let hits = stored
            .searchable
            .iter()
            .skip(request.from)
            .take(request.size)
            .map(|((doc_type, id), body)| SearchHit {
                doc_type: doc_type.clone(),
                id: id.clone(),
                source: body.as_bytes().to_vec(),
            })
            .collect();

        Ok(SearchResponse {
            total_hits: stored.searchable.len() as u64,
            hits,
        })
    }

    async fn get_mapping(&self, name: &str) -> Result<String, SearchIndexError> {
        self.check_available()?;
        let indices = self.indices.read().await;
        let stored = indices
            .get(name)
            .ok_or_else(|| SearchIndexError::mapping_not_found(name))?;

        let mut response = serde_json::Map::new();
        response.insert(name.to_string(), json!({ "mappings": stored.mappings }));
        serde_json::to_string(&response).map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.check_available()?;
        Ok(true)
    }
}
