//! Dependency initialization and wiring for the news indexer.

use std::sync::Arc;
use tracing::{error, info};

use crate::config::IndexerConfig;
use crate::IndexingError;
use news_indexer_repository::{IndexClient, OpenSearchEngine, SearchEngine};

/// Container for all initialized dependencies.
///
/// Owns the only connection to the search engine; dropping it releases the
/// connection.
pub struct Dependencies {
    /// The configuration the dependencies were built from.
    pub config: IndexerConfig,
    /// The index client, ready to use.
    pub client: IndexClient,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the engine cannot be reached or is unhealthy
    pub async fn new(config: IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.engine.url,
            article_index = %config.article.index,
            article_type = %config.article.doc_type,
            article_mapping = %config.article.mapping,
            "Initializing dependencies"
        );

        let engine = OpenSearchEngine::new(&config.engine).map_err(|e| {
            IndexingError::config(format!("Failed to create OpenSearch client: {}", e))
        })?;

        Self::with_engine(config, Arc::new(engine)).await
    }

    /// Initialize dependencies over an already constructed engine.
    pub async fn with_engine(
        config: IndexerConfig,
        engine: Arc<dyn SearchEngine>,
    ) -> Result<Self, IndexingError> {
        // Verify the engine is reachable
        let healthy = engine.health_check().await.map_err(|e| {
            if e.is_unavailable() {
                error!(error = %e, "Search engine is unreachable");
            }
            IndexingError::config(format!("OpenSearch health check failed: {}", e))
        })?;

        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        Ok(Self {
            config,
            client: IndexClient::new(engine),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_indexer_repository::InMemoryEngine;

    #[tokio::test]
    async fn test_with_engine() {
        let engine = Arc::new(InMemoryEngine::new());
        let deps = Dependencies::with_engine(IndexerConfig::default(), engine)
            .await
            .unwrap();

        assert_eq!(deps.config.article.index, "articles");
        assert!(!deps.client.exists("articles").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_engine() {
        let engine = InMemoryEngine::new();
        engine.set_unavailable(true);

        let result = Dependencies::with_engine(IndexerConfig::default(), Arc::new(engine)).await;

        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}
