//! OpenSearch engine implementation.
//!
//! This module provides the concrete implementation of `SearchEngine`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetMappingParts,
        IndicesRefreshParts,
    },
    GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{value::RawValue, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::SearchEngineConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchEngine;
use crate::opensearch::queries::build_match_all_query;
use crate::opensearch::responses::{
    classify_create, classify_get, classify_index_scoped, classify_mapping, classify_write,
    document_id, parse_document_source, parse_search_response, EngineFailure,
};
use crate::types::{SearchRequest, SearchResponse};

/// OpenSearch engine implementation.
///
/// Holds one connection pool for its whole lifetime; the pool is released when
/// the engine is dropped. Document types are folded into the document id
/// (`{doc_type}#{id}`) since OpenSearch indices are typeless.
///
/// # Example
///
/// ```ignore
/// let config = SearchEngineConfig::new("http://localhost:9200");
/// let engine = OpenSearchEngine::new(&config)?;
///
/// engine.create_index("articles", "{}").await?;
/// engine.upsert_document("articles", "article", "1", r#"{"title":"Hello"}"#).await?;
/// let body = engine.get_document("articles", "article", "1").await?;
/// ```
pub struct OpenSearchEngine {
    client: OpenSearch,
}

impl OpenSearchEngine {
    /// Create a new OpenSearch engine connected to the configured URL.
    ///
    /// No request is made here; use `health_check` to verify the connection.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchEngine)` - A new engine instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or transport setup fails
    pub fn new(config: &SearchEngineConfig) -> Result<Self, SearchIndexError> {
        let parsed_url = Url::parse(&config.url)
            .map_err(|e| SearchIndexError::validation(format!("Invalid engine URL: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        info!(
            url = %config.url,
            timeout_ms = config.timeout.map(|t| t.as_millis() as u64),
            "Created OpenSearch engine"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Read a failed response into an `EngineFailure`.
    async fn failure(response: Response) -> EngineFailure {
        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            error!(status = %status, body = %body, "OpenSearch request failed");
        } else {
            debug!(status = %status, body = %body, "OpenSearch request refused");
        }
        EngineFailure::from_body(status.as_u16(), &body)
    }
}

#[async_trait]
impl SearchEngine for OpenSearchEngine {
    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(Self::failure(response).await.into_error()),
        }
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: &str) -> Result<(), SearchIndexError> {
        let body: &RawValue = serde_json::from_str(body)
            .map_err(|e| SearchIndexError::schema_invalid(e.to_string()))?;

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_create(index, Self::failure(response).await));
        }

        info!(index = %index, "Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_index_scoped(index, Self::failure(response).await));
        }

        info!(index = %index, "Index deleted");
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn upsert_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &str,
    ) -> Result<(), SearchIndexError> {
        let body: &RawValue = serde_json::from_str(body)
            .map_err(|e| SearchIndexError::document_rejected(e.to_string()))?;
        let doc_id = document_id(doc_type, id);

        let response = self
            .client
            .index(IndexParts::IndexId(index, &doc_id))
            .body(body)
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_write(index, Self::failure(response).await));
        }

        debug!(index = %index, doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<Vec<u8>, SearchIndexError> {
        let doc_id = document_id(doc_type, id);

        let response = self
            .client
            .get(GetParts::IndexId(index, &doc_id))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_get(
                index,
                doc_type,
                id,
                Self::failure(response).await,
            ));
        }

        let text = response.text().await?;
        parse_document_source(&text)?
            .ok_or_else(|| SearchIndexError::document_not_found(index, doc_type, id))
    }

    #[instrument(skip(self))]
    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_index_scoped(index, Self::failure(response).await));
        }

        debug!(index = %index, "Index refreshed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(build_match_all_query(request))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_index_scoped(index, Self::failure(response).await));
        }

        let text = response.text().await?;
        let result = parse_search_response(&text)?;

        debug!(
            index = %index,
            total_hits = result.total_hits,
            returned = result.hits.len(),
            "Search completed"
        );
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn get_mapping(&self, name: &str) -> Result<String, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[name]))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(classify_mapping(name, Self::failure(response).await));
        }

        let text = response.text().await?;

        // A wildcard that matches nothing answers 200 with an empty object.
        let parsed: Value =
            serde_json::from_str(&text).map_err(|e| SearchIndexError::parse(e.to_string()))?;
        if parsed.as_object().map_or(true, |m| m.is_empty()) {
            return Err(SearchIndexError::mapping_not_found(name));
        }

        Ok(text)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        info!("Checking OpenSearch health...");

        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await?;

        if !response.status_code().is_success() {
            let failure = Self::failure(response).await;
            warn!(status = failure.status, reason = %failure.reason, "Health check refused");
            return Ok(false);
        }

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        info!(status = %status, "OpenSearch cluster status");

        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = SearchEngineConfig::new("not a url");
        let result = OpenSearchEngine::new(&config);

        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[test]
    fn test_new_with_timeout() {
        let config =
            SearchEngineConfig::new("http://localhost:9200").with_timeout(Duration::from_secs(5));

        assert!(OpenSearchEngine::new(&config).is_ok());
    }
}
