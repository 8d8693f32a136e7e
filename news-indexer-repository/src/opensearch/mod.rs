//! OpenSearch implementation of the search engine.
//!
//! This module provides a concrete implementation of `SearchEngine`
//! using OpenSearch as the backend.

mod client;
mod index_config;
mod queries;
mod responses;

pub use client::OpenSearchEngine;
pub use index_config::{article_index_settings, ARTICLE_DOC_TYPE, ARTICLE_INDEX_NAME};
pub(crate) use responses::TYPE_SEPARATOR;
