//! Search engine trait definition.
//!
//! This module defines the capabilities the index client needs from a search
//! engine, allowing for different backend implementations (OpenSearch, an
//! in-memory double for tests, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{SearchRequest, SearchResponse};

/// Abstract interface for search engine operations.
///
/// Every method is a single round trip to the engine. Implementations perform
/// no retries and keep no state between calls beyond their connection, so
/// consistency and ordering are whatever the engine itself provides.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchIndexError>`. Transport failures map to
/// `SearchIndexError::EngineUnavailable`; answers from the engine map to the
/// variant that names them.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Check whether an index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index exists
    /// * `Ok(false)` - If it does not
    /// * `Err(SearchIndexError)` - If the check could not be performed
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings and mappings.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `body` - Serialized JSON with optional `settings` and `mappings` keys
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError::IndexAlreadyExists)` - If the index is already present
    /// * `Err(SearchIndexError::SchemaInvalid)` - If the engine refused the body
    async fn create_index(&self, index: &str, body: &str) -> Result<(), SearchIndexError>;

    /// Delete an index and every document in it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted
    /// * `Err(SearchIndexError::IndexNotFound)` - If the index does not exist
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Index a document, replacing any document stored at the same coordinates.
    ///
    /// The document is immediately retrievable by `get_document` but only
    /// becomes visible to `search` after a `refresh`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was stored
    /// * `Err(SearchIndexError::DocumentRejected)` - If the engine refused the body
    async fn upsert_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &str,
    ) -> Result<(), SearchIndexError>;

    /// Fetch the stored body of a document, byte for byte as it was indexed.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The serialized body
    /// * `Err(SearchIndexError::DocumentNotFound)` - If no document is stored there
    /// * `Err(SearchIndexError::IndexNotFound)` - If the index does not exist
    async fn get_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<Vec<u8>, SearchIndexError>;

    /// Make every document written so far visible to searches on the index.
    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Run a match-all search over an index.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.refresh("articles").await?;
    /// let response = engine.search("articles", &SearchRequest::default()).await?;
    /// println!("Found {} documents", response.total_hits);
    /// ```
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchIndexError>;

    /// Fetch a mapping by name as serialized JSON.
    ///
    /// The name is resolved by the engine (an index, alias or pattern), and the
    /// result has the engine's shape: `{"<index>": {"mappings": {...}}}`.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The serialized mapping structure
    /// * `Err(SearchIndexError::MappingNotFound)` - If nothing matches the name
    async fn get_mapping(&self, name: &str) -> Result<String, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
