//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the article index.

use serde_json::{json, Value};

/// The default name of the article index.
pub const ARTICLE_INDEX_NAME: &str = "articles";

/// The default document type for articles.
pub const ARTICLE_DOC_TYPE: &str = "article";

/// Get the index settings and mappings for the article index.
///
/// The configuration includes:
/// - **Text fields**: `title`, `summary` and `body` for full-text search, with
///   a `raw` keyword subfield on `title` for exact matches and sorting
/// - **Keyword fields**: `source` and `authors` for filtering
/// - **Date fields**: publication and indexing timestamps
///
/// `url` is stored but not indexed.
pub fn article_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "summary": {
                    "type": "text"
                },
                "body": {
                    "type": "text"
                },
                "url": {
                    "type": "keyword",
                    "index": false
                },
                "source": {
                    "type": "keyword"
                },
                "authors": {
                    "type": "keyword"
                },
                "published_at": {
                    "type": "date"
                },
                "indexed_at": {
                    "type": "date"
                }
            }
        }
    })
}
