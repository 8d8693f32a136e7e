//! Decoding of OpenSearch responses.
//!
//! Successful bodies are decoded into the repository types; failed ones are
//! read as the engine's error envelope and classified per operation into a
//! `SearchIndexError`.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::errors::SearchIndexError;
use crate::types::{SearchHit, SearchResponse};

const RESOURCE_ALREADY_EXISTS: &str = "resource_already_exists_exception";
const INDEX_NOT_FOUND: &str = "index_not_found_exception";

/// A non-success answer from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EngineFailure {
    pub status: u16,
    pub error_type: Option<String>,
    pub reason: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(rename = "type")]
        error_type: String,
        reason: Option<String>,
    },
    Message(String),
}

impl EngineFailure {
    /// Read a failure from a status code and the raw response body.
    ///
    /// Bodies that are not an error envelope (e.g. `{"found": false}` or an
    /// empty HEAD response) keep the body text as the reason.
    pub fn from_body(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error);

        match envelope {
            Some(ErrorBody::Detailed { error_type, reason }) => Self {
                status,
                reason: reason.unwrap_or_else(|| error_type.clone()),
                error_type: Some(error_type),
            },
            Some(ErrorBody::Message(reason)) => Self {
                status,
                error_type: None,
                reason,
            },
            None => Self {
                status,
                error_type: None,
                reason: body.to_string(),
            },
        }
    }

    fn is_type(&self, error_type: &str) -> bool {
        self.error_type.as_deref() == Some(error_type)
    }

    /// Fallback for statuses no operation claims.
    pub fn into_error(self) -> SearchIndexError {
        match self.status {
            500..=599 => SearchIndexError::unavailable(format!(
                "status {}: {}",
                self.status, self.reason
            )),
            _ => SearchIndexError::unexpected(self.status, self.reason),
        }
    }
}

pub(crate) fn classify_create(index: &str, failure: EngineFailure) -> SearchIndexError {
    if failure.is_type(RESOURCE_ALREADY_EXISTS) {
        SearchIndexError::index_already_exists(index)
    } else if failure.status == 400 {
        SearchIndexError::schema_invalid(failure.reason)
    } else {
        failure.into_error()
    }
}

pub(crate) fn classify_index_scoped(index: &str, failure: EngineFailure) -> SearchIndexError {
    if failure.is_type(INDEX_NOT_FOUND) || failure.status == 404 {
        SearchIndexError::index_not_found(index)
    } else {
        failure.into_error()
    }
}

pub(crate) fn classify_write(index: &str, failure: EngineFailure) -> SearchIndexError {
    if failure.is_type(INDEX_NOT_FOUND) {
        SearchIndexError::index_not_found(index)
    } else if failure.status == 400 {
        SearchIndexError::document_rejected(failure.reason)
    } else {
        failure.into_error()
    }
}

pub(crate) fn classify_get(
    index: &str,
    doc_type: &str,
    id: &str,
    failure: EngineFailure,
) -> SearchIndexError {
    if failure.is_type(INDEX_NOT_FOUND) {
        SearchIndexError::index_not_found(index)
    } else if failure.status == 404 {
        SearchIndexError::document_not_found(index, doc_type, id)
    } else {
        failure.into_error()
    }
}

pub(crate) fn classify_mapping(name: &str, failure: EngineFailure) -> SearchIndexError {
    if failure.status == 404 {
        SearchIndexError::mapping_not_found(name)
    } else {
        failure.into_error()
    }
}

#[derive(Deserialize)]
struct GetDocumentBody<'a> {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source", borrow)]
    source: Option<&'a RawValue>,
}

/// Extract the stored `_source` from a get-document response.
///
/// Returns `Ok(None)` when the engine reports the document as not found.
pub(crate) fn parse_document_source(body: &str) -> Result<Option<Vec<u8>>, SearchIndexError> {
    let parsed: GetDocumentBody<'_> =
        serde_json::from_str(body).map_err(|e| SearchIndexError::parse(e.to_string()))?;

    if !parsed.found {
        return Ok(None);
    }

    let source = parsed
        .source
        .ok_or_else(|| SearchIndexError::parse("document found without _source"))?;
    Ok(Some(source.get().as_bytes().to_vec()))
}

#[derive(Deserialize)]
struct SearchBody<'a> {
    #[serde(borrow)]
    hits: HitsBody<'a>,
}

#[derive(Deserialize)]
struct HitsBody<'a> {
    total: TotalHits,
    #[serde(borrow, default)]
    hits: Vec<HitBody<'a>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

#[derive(Deserialize)]
struct HitBody<'a> {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", borrow)]
    source: Option<&'a RawValue>,
}

/// Decode a search response, splitting physical ids back into type and id.
pub(crate) fn parse_search_response(body: &str) -> Result<SearchResponse, SearchIndexError> {
    let parsed: SearchBody<'_> =
        serde_json::from_str(body).map_err(|e| SearchIndexError::parse(e.to_string()))?;

    let total_hits = match parsed.hits.total {
        TotalHits::Count(count) => count,
        TotalHits::Object { value } => value,
    };

    let hits = parsed
        .hits
        .hits
        .into_iter()
        .map(|hit| {
            let (doc_type, id) = split_document_id(&hit.id);
            SearchHit {
                doc_type: doc_type.to_string(),
                id: id.to_string(),
                source: hit
                    .source
                    .map(|s| s.get().as_bytes().to_vec())
                    .unwrap_or_default(),
            }
        })
        .collect();

    Ok(SearchResponse { total_hits, hits })
}

/// Separator between document type and id in the engine's document id.
pub(crate) const TYPE_SEPARATOR: char = '#';

/// Build the engine document id for a (type, id) pair.
///
/// Uses format: `{doc_type}#{id}` so ids are unique per type within an index.
pub(crate) fn document_id(doc_type: &str, id: &str) -> String {
    format!("{}{}{}", doc_type, TYPE_SEPARATOR, id)
}

/// Split an engine document id into (type, id). Ids written without a type
/// come back with an empty type.
pub(crate) fn split_document_id(doc_id: &str) -> (&str, &str) {
    doc_id.split_once(TYPE_SEPARATOR).unwrap_or(("", doc_id))
}
