//! Index client behavior against the in-memory engine.

use std::sync::Arc;

use async_trait::async_trait;
use news_indexer_repository::opensearch::article_index_settings;
use news_indexer_repository::{
    InMemoryEngine, IndexClient, SearchEngine, SearchIndexError, SearchRequest, SearchResponse,
};
use serde_json::Value;
use tokio::sync::Barrier;

const INDEX: &str = "articles";
const DOC_TYPE: &str = "article";

fn client() -> (IndexClient, Arc<InMemoryEngine>) {
    let engine = Arc::new(InMemoryEngine::new());
    (IndexClient::new(engine.clone()), engine)
}

#[tokio::test]
async fn test_create() {
    let (client, _) = client();

    client.create(INDEX, "{}").await.unwrap();

    assert!(client.exists(INDEX).await.unwrap());
}

#[tokio::test]
async fn test_create_twice_fails() {
    let (client, _) = client();

    client.create(INDEX, "{}").await.unwrap();
    let result = client.create(INDEX, "{}").await;

    assert!(matches!(result, Err(SearchIndexError::IndexAlreadyExists(_))));
}

#[tokio::test]
async fn test_ensure_is_idempotent() {
    let (client, engine) = client();
    let mapping = article_index_settings().to_string();

    for _ in 1..=2 {
        client.ensure(INDEX, &mapping).await.unwrap();
        assert!(client.exists(INDEX).await.unwrap());
    }

    // The second call must not have recreated (and emptied) the index
    client
        .index(INDEX, DOC_TYPE, "id", r#"{"title":"kept"}"#)
        .await
        .unwrap();
    client.ensure(INDEX, &mapping).await.unwrap();
    assert_eq!(engine.document_count(INDEX).await, Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ensure() {
    let (client, engine) = client();
    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));

    let tasks: Vec<_> = (0..callers)
        .map(|_| {
            let client = client.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                client.ensure(INDEX, "{}").await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert!(client.exists(INDEX).await.unwrap());
    assert_eq!(engine.document_count(INDEX).await, Some(0));
}

/// Engine whose existence check always reports the index as missing, so
/// every `ensure` after the first one reaches `create` on an existing index.
struct StaleExistsEngine(InMemoryEngine);

#[async_trait]
impl SearchEngine for StaleExistsEngine {
    async fn index_exists(&self, _index: &str) -> Result<bool, SearchIndexError> {
        Ok(false)
    }

    async fn create_index(&self, index: &str, body: &str) -> Result<(), SearchIndexError> {
        self.0.create_index(index, body).await
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.0.delete_index(index).await
    }

    async fn upsert_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &str,
    ) -> Result<(), SearchIndexError> {
        self.0.upsert_document(index, doc_type, id, body).await
    }

    async fn get_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<Vec<u8>, SearchIndexError> {
        self.0.get_document(index, doc_type, id).await
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
        self.0.refresh(index).await
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchIndexError> {
        self.0.search(index, request).await
    }

    async fn get_mapping(&self, name: &str) -> Result<String, SearchIndexError> {
        self.0.get_mapping(name).await
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.0.health_check().await
    }
}

#[tokio::test]
async fn test_ensure_after_lost_creation_race() {
    let engine = Arc::new(StaleExistsEngine(InMemoryEngine::new()));
    let client = IndexClient::new(engine.clone());

    client.ensure(INDEX, "{}").await.unwrap();
    client.index(INDEX, DOC_TYPE, "id", "{}").await.unwrap();

    // The create inside this call fails with IndexAlreadyExists
    client.ensure(INDEX, "{}").await.unwrap();

    // The existing index was left alone
    assert_eq!(engine.0.document_count(INDEX).await, Some(1));
    let result = client.create(INDEX, "{}").await;
    assert!(matches!(result, Err(SearchIndexError::IndexAlreadyExists(_))));
}

#[tokio::test]
async fn test_delete() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();

    client.delete(INDEX).await.unwrap();

    assert!(!client.exists(INDEX).await.unwrap());
}

#[tokio::test]
async fn test_delete_missing_index() {
    let (client, _) = client();

    let result = client.delete(INDEX).await;

    assert!(matches!(result, Err(SearchIndexError::IndexNotFound(_))));
}

#[tokio::test]
async fn test_delete_drops_documents() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();
    client.index(INDEX, DOC_TYPE, "id", "{}").await.unwrap();

    client.delete(INDEX).await.unwrap();
    client.create(INDEX, "{}").await.unwrap();

    let result = client.get(INDEX, DOC_TYPE, "id").await;
    assert!(matches!(result, Err(SearchIndexError::DocumentNotFound(_))));
}

#[tokio::test]
async fn test_index_visible_after_refresh() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();

    let response = client
        .engine()
        .search(INDEX, &SearchRequest::page(0, 10))
        .await
        .unwrap();
    assert_eq!(response.total_hits, 0);

    client.index(INDEX, DOC_TYPE, "id", "{}").await.unwrap();
    client.engine().refresh(INDEX).await.unwrap();

    let response = client
        .engine()
        .search(INDEX, &SearchRequest::page(0, 10))
        .await
        .unwrap();
    assert_eq!(response.total_hits, 1);
}

#[tokio::test]
async fn test_reindex_replaces_document() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();

    client
        .index(INDEX, DOC_TYPE, "id", r#"{"rev":1}"#)
        .await
        .unwrap();
    client
        .index(INDEX, DOC_TYPE, "id", r#"{"rev":2}"#)
        .await
        .unwrap();
    client.engine().refresh(INDEX).await.unwrap();

    let body = client.get(INDEX, DOC_TYPE, "id").await.unwrap();
    assert_eq!(body, br#"{"rev":2}"#.to_vec());

    let response = client
        .engine()
        .search(INDEX, &SearchRequest::default())
        .await
        .unwrap();
    assert_eq!(response.total_hits, 1);
}

#[tokio::test]
async fn test_get_round_trip() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();
    let body = r#"{"foo": "bar", "nested": {"z": 1, "a": [true, null]}}"#;

    client.index(INDEX, DOC_TYPE, "id", body).await.unwrap();
    client.engine().refresh(INDEX).await.unwrap();
    let stored = client.get(INDEX, DOC_TYPE, "id").await.unwrap();

    assert_eq!(stored, body.as_bytes().to_vec());
    let source: Value = serde_json::from_slice(&stored).unwrap();
    assert_eq!(source["foo"], "bar");
}

#[tokio::test]
async fn test_get_missing_document() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();

    let result = client.get(INDEX, DOC_TYPE, "missing").await;

    assert!(matches!(result, Err(SearchIndexError::DocumentNotFound(_))));
}

#[tokio::test]
async fn test_get_mapping() {
    let (client, _) = client();
    client
        .ensure(INDEX, &article_index_settings().to_string())
        .await
        .unwrap();

    let mapping = client.get_mapping(INDEX).await.unwrap();

    assert!(!mapping.is_empty());
    let parsed: Value = serde_json::from_str(&mapping).unwrap();
    assert_eq!(
        parsed[INDEX]["mappings"]["properties"]["title"]["type"],
        "text"
    );
}

#[tokio::test]
async fn test_get_mapping_unknown_name() {
    let (client, _) = client();

    let result = client.get_mapping("unknown").await;

    assert!(matches!(result, Err(SearchIndexError::MappingNotFound(_))));
}

#[tokio::test]
async fn test_engine_unavailable_is_forwarded() {
    let (client, engine) = client();
    engine.set_unavailable(true);

    assert!(matches!(
        client.ensure(INDEX, "{}").await,
        Err(SearchIndexError::EngineUnavailable(_))
    ));
    assert!(matches!(
        client.get(INDEX, DOC_TYPE, "id").await,
        Err(SearchIndexError::EngineUnavailable(_))
    ));
}

#[tokio::test]
async fn test_rejected_document() {
    let (client, _) = client();
    client.create(INDEX, "{}").await.unwrap();

    let result = client.index(INDEX, DOC_TYPE, "id", "[1, 2, 3]").await;

    assert!(matches!(result, Err(SearchIndexError::DocumentRejected(_))));
}
