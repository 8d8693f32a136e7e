//! Startup tasks for the article index.

use serde_json::Value;
use tracing::{info, instrument};

use crate::config::Dependencies;
use crate::IndexingError;
use news_indexer_repository::opensearch::article_index_settings;

/// What the bootstrap found once the article index was in place.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// The ensured index.
    pub index: String,
    /// The mapping the engine holds under the configured mapping name.
    pub mapping: Value,
}

impl BootstrapReport {
    /// Names of the fields mapped on the article index, sorted.
    pub fn mapped_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .mapping
            .as_object()
            .into_iter()
            .flat_map(|indices| indices.values())
            .filter_map(|index| index["mappings"]["properties"].as_object())
            .flat_map(|properties| properties.keys().cloned())
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }
}

/// Ensure the article index exists and read back its mapping.
#[instrument(skip(deps), fields(index = %deps.config.article.index))]
pub async fn run(deps: &Dependencies) -> Result<BootstrapReport, IndexingError> {
    let article = &deps.config.article;

    deps.client
        .ensure(&article.index, &article_index_settings().to_string())
        .await?;

    let raw = deps.client.get_mapping(&article.mapping).await?;
    let mapping: Value = serde_json::from_str(&raw)
        .map_err(|e| IndexingError::config(format!("Mapping is not valid JSON: {}", e)))?;

    let report = BootstrapReport {
        index: article.index.clone(),
        mapping,
    };

    info!(
        index = %report.index,
        mapping = %article.mapping,
        fields = ?report.mapped_fields(),
        "Article index ready"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexerConfig;
    use news_indexer_repository::{InMemoryEngine, SearchIndexError};
    use std::sync::Arc;

    async fn deps(config: IndexerConfig) -> Dependencies {
        Dependencies::with_engine(config, Arc::new(InMemoryEngine::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_creates_article_index() {
        let deps = deps(IndexerConfig::default()).await;

        let report = run(&deps).await.unwrap();

        assert_eq!(report.index, "articles");
        assert!(deps.client.exists("articles").await.unwrap());
        assert!(report.mapped_fields().contains(&"title".to_string()));
        assert!(report.mapped_fields().contains(&"published_at".to_string()));
    }

    #[tokio::test]
    async fn test_run_twice() {
        let deps = deps(IndexerConfig::default()).await;

        let first = run(&deps).await.unwrap();
        let second = run(&deps).await.unwrap();

        assert_eq!(first.mapping, second.mapping);
    }

    #[tokio::test]
    async fn test_run_with_unknown_mapping_name() {
        let mut config = IndexerConfig::default();
        config.article.mapping = "missing".to_string();
        let deps = deps(config).await;

        let result = run(&deps).await;

        assert!(matches!(
            result,
            Err(IndexingError::SearchError(SearchIndexError::MappingNotFound(_)))
        ));
    }
}
