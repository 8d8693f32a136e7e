//! Indexer configuration read from the environment.

use std::env;
use std::time::Duration;

use news_indexer_repository::config::DEFAULT_ENGINE_URL;
use news_indexer_repository::opensearch::{ARTICLE_DOC_TYPE, ARTICLE_INDEX_NAME};
use news_indexer_repository::SearchEngineConfig;

use crate::IndexingError;

/// Where articles live in the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleConfig {
    /// Index holding article documents.
    pub index: String,
    /// Document type articles are indexed under.
    pub doc_type: String,
    /// Name the article mapping is fetched by.
    pub mapping: String,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            index: ARTICLE_INDEX_NAME.to_string(),
            doc_type: ARTICLE_DOC_TYPE.to_string(),
            mapping: ARTICLE_INDEX_NAME.to_string(),
        }
    }
}

/// Static configuration for the indexer, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct IndexerConfig {
    /// Search engine connection settings.
    pub engine: SearchEngineConfig,
    /// Article index coordinates.
    pub article: ArticleConfig,
}

impl IndexerConfig {
    /// Read configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_TIMEOUT_SECS`: Per-request timeout in seconds (default: none)
    /// - `ARTICLE_INDEX`: Article index name (default: articles)
    /// - `ARTICLE_TYPE`: Article document type (default: article)
    /// - `ARTICLE_MAPPING`: Mapping name (default: the article index name)
    ///
    /// # Returns
    ///
    /// * `Ok(IndexerConfig)` - The parsed configuration
    /// * `Err(IndexingError)` - If a value cannot be parsed
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the value set for
    /// a variable, if any.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = value("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string());
        let timeout = match value("OPENSEARCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    IndexingError::config(format!(
                        "OPENSEARCH_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let index = value("ARTICLE_INDEX").unwrap_or_else(|| ARTICLE_INDEX_NAME.to_string());
        let doc_type = value("ARTICLE_TYPE").unwrap_or_else(|| ARTICLE_DOC_TYPE.to_string());
        let mapping = value("ARTICLE_MAPPING").unwrap_or_else(|| index.clone());

        Ok(Self {
            engine: SearchEngineConfig { url, timeout },
            article: ArticleConfig {
                index,
                doc_type,
                mapping,
            },
        })
    }
}
