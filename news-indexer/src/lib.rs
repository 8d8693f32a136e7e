//! # News Indexer
//!
//! Entry point and configuration for the news article search index.
//!
//! This crate reads its configuration from the environment, wires the index
//! client to OpenSearch and makes sure the article index is in place.

pub mod bootstrap;
pub mod config;
pub mod logging;

pub use config::{Dependencies, IndexerConfig};

use news_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
