//! Index client implementation.
//!
//! This module provides the facade application code uses to manage indices
//! and store or fetch documents. Each operation validates its arguments and
//! then makes exactly one engine call (`ensure` makes at most two); engine
//! errors are returned as they come.

use std::sync::Arc;

use serde_json::value::RawValue;
use tracing::{debug, info, instrument, warn};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchEngine;
use crate::opensearch::TYPE_SEPARATOR;

/// Characters the engine refuses in index names.
const INVALID_INDEX_CHARS: [char; 12] =
    [' ', '"', '*', '\\', '<', '|', ',', '>', '/', '?', '#', ':'];

/// Longest index name the engine accepts, in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// The main client for managing indices and documents.
///
/// Cloning is cheap and every clone shares the same engine connection, so a
/// client can be handed to as many tasks as needed.
#[derive(Clone)]
pub struct IndexClient {
    engine: Arc<dyn SearchEngine>,
}

impl IndexClient {
    /// Create a new IndexClient over the given engine.
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    /// The underlying engine, for operations the client does not wrap
    /// (refresh, search, health checks).
    pub fn engine(&self) -> &dyn SearchEngine {
        self.engine.as_ref()
    }

    /// Check whether an index exists.
    #[instrument(skip(self))]
    pub async fn exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        validate_index_name(index)?;
        self.engine.index_exists(index).await
    }

    /// Make sure an index exists, creating it with `mapping` if it does not.
    ///
    /// Calling this repeatedly with the same arguments leaves the engine in
    /// the same state as calling it once. The existence check and the create
    /// are two separate round trips; if another caller creates the index in
    /// between, the resulting `IndexAlreadyExists` is treated as success.
    ///
    /// Input: index name, serialized index body (`settings`/`mappings`)
    /// Output: Result<(), SearchIndexError>
    #[instrument(skip(self, mapping))]
    pub async fn ensure(&self, index: &str, mapping: &str) -> Result<(), SearchIndexError> {
        validate_index_name(index)?;
        validate_mapping(mapping)?;

        if self.engine.index_exists(index).await? {
            debug!(index = %index, "Index already present");
            return Ok(());
        }

        match self.engine.create_index(index, mapping).await {
            Ok(()) => {
                info!(index = %index, "Index ensured");
                Ok(())
            }
            Err(SearchIndexError::IndexAlreadyExists(_)) => {
                warn!(index = %index, "Index was created concurrently");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Create an index, failing if it is already present.
    ///
    /// Input: index name, serialized index body (`settings`/`mappings`)
    /// Output: Result<(), SearchIndexError>
    #[instrument(skip(self, mapping))]
    pub async fn create(&self, index: &str, mapping: &str) -> Result<(), SearchIndexError> {
        validate_index_name(index)?;
        validate_mapping(mapping)?;

        self.engine.create_index(index, mapping).await
    }

    /// Delete an index and all of its documents.
    #[instrument(skip(self))]
    pub async fn delete(&self, index: &str) -> Result<(), SearchIndexError> {
        validate_index_name(index)?;

        self.engine.delete_index(index).await
    }

    /// Store a document at (index, type, id), replacing whatever was there.
    ///
    /// The body is passed through untouched. It is retrievable with `get`
    /// right away, but searches only see it after the index is refreshed.
    ///
    /// Input: index name, document type, document id, serialized JSON body
    /// Output: Result<(), SearchIndexError>
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn index(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &str,
    ) -> Result<(), SearchIndexError> {
        validate_index_name(index)?;
        validate_coordinates(doc_type, id)?;
        serde_json::from_str::<&RawValue>(body)
            .map_err(|e| SearchIndexError::document_rejected(format!("Invalid JSON body: {}", e)))?;

        self.engine.upsert_document(index, doc_type, id, body).await?;

        debug!(index = %index, doc_type = %doc_type, id = %id, "Document indexed");
        Ok(())
    }

    /// Fetch the stored body at (index, type, id), exactly as it was indexed.
    ///
    /// Input: index name, document type, document id
    /// Output: Result<Vec<u8>, SearchIndexError> (DocumentNotFound if absent)
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<Vec<u8>, SearchIndexError> {
        validate_index_name(index)?;
        validate_coordinates(doc_type, id)?;

        self.engine.get_document(index, doc_type, id).await
    }

    /// Fetch a mapping by name as serialized JSON.
    #[instrument(skip(self))]
    pub async fn get_mapping(&self, name: &str) -> Result<String, SearchIndexError> {
        if name.is_empty() {
            return Err(SearchIndexError::validation("mapping name is required"));
        }

        self.engine.get_mapping(name).await
    }
}

fn validate_index_name(index: &str) -> Result<(), SearchIndexError> {
    if index.is_empty() {
        return Err(SearchIndexError::validation("index name is required"));
    }
    if index == "." || index == ".." {
        return Err(SearchIndexError::validation(format!(
            "index name [{}] is reserved",
            index
        )));
    }
    if index.len() > MAX_INDEX_NAME_BYTES {
        return Err(SearchIndexError::validation(format!(
            "index name is {} bytes, longer than {}",
            index.len(),
            MAX_INDEX_NAME_BYTES
        )));
    }
    if index.starts_with(['_', '-', '+']) {
        return Err(SearchIndexError::validation(format!(
            "index name [{}] must not start with '_', '-' or '+'",
            index
        )));
    }
    if index.chars().any(|c| c.is_uppercase()) {
        return Err(SearchIndexError::validation(format!(
            "index name [{}] must be lowercase",
            index
        )));
    }
    if index.contains(INVALID_INDEX_CHARS) {
        return Err(SearchIndexError::validation(format!(
            "index name [{}] contains an invalid character",
            index
        )));
    }
    Ok(())
}

fn validate_coordinates(doc_type: &str, id: &str) -> Result<(), SearchIndexError> {
    if doc_type.is_empty() {
        return Err(SearchIndexError::validation("document type is required"));
    }
    if doc_type.contains(TYPE_SEPARATOR) {
        return Err(SearchIndexError::validation(format!(
            "document type [{}] must not contain '{}'",
            doc_type, TYPE_SEPARATOR
        )));
    }
    if id.is_empty() {
        return Err(SearchIndexError::validation("document id is required"));
    }
    Ok(())
}

fn validate_mapping(mapping: &str) -> Result<(), SearchIndexError> {
    serde_json::from_str::<&RawValue>(mapping)
        .map(|_| ())
        .map_err(|e| SearchIndexError::schema_invalid(format!("Invalid JSON mapping: {}", e)))
}
