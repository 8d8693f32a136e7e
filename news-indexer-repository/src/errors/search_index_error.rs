//! Search index error types.
//!
//! This module defines the error types that can occur during index client
//! operations. Every failure reported by the search engine is mapped onto one
//! of these variants; none of them are retried locally.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., empty index name). Raised before any round trip.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The search engine could not be reached or failed at the transport level.
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The index is already present in the search engine.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// The index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// No document is stored at the requested coordinates.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// The engine refused the document body (e.g., schema mismatch).
    #[error("Document rejected: {0}")]
    DocumentRejected(String),

    /// The index settings or mapping definition is not acceptable.
    #[error("Schema invalid: {0}")]
    SchemaInvalid(String),

    /// No mapping is known under the requested name.
    #[error("Mapping not found: {0}")]
    MappingNotFound(String),

    /// The engine answered with a status that has no dedicated variant.
    #[error("Unexpected response with status {status}: {reason}")]
    UnexpectedResponse { status: u16, reason: String },

    /// Failed to decode a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an engine unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Create an index already exists error.
    pub fn index_already_exists(index: &str) -> Self {
        Self::IndexAlreadyExists(index.to_string())
    }

    /// Create an index not found error.
    pub fn index_not_found(index: &str) -> Self {
        Self::IndexNotFound(index.to_string())
    }

    /// Create a document not found error.
    pub fn document_not_found(index: &str, doc_type: &str, id: &str) -> Self {
        Self::DocumentNotFound(format!("index={}, type={}, id={}", index, doc_type, id))
    }

    /// Create a document rejected error.
    pub fn document_rejected(msg: impl Into<String>) -> Self {
        Self::DocumentRejected(msg.into())
    }

    /// Create a schema invalid error.
    pub fn schema_invalid(msg: impl Into<String>) -> Self {
        Self::SchemaInvalid(msg.into())
    }

    /// Create a mapping not found error.
    pub fn mapping_not_found(name: &str) -> Self {
        Self::MappingNotFound(name.to_string())
    }

    /// Create an unexpected response error.
    pub fn unexpected(status: u16, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            status,
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether the failure happened at the transport level rather than being
    /// an answer from the engine.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::EngineUnavailable(_))
    }
}

impl From<opensearch::Error> for SearchIndexError {
    fn from(err: opensearch::Error) -> Self {
        Self::EngineUnavailable(err.to_string())
    }
}
