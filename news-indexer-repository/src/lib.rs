//! # News Indexer Repository
//!
//! This crate provides the index client used by the news indexer to manage
//! indices and store or fetch documents in the search engine. It includes
//! definitions for errors, the engine interface, a concrete implementation
//! for OpenSearch and an in-memory engine for tests.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod types;

pub use client::IndexClient;
pub use config::SearchEngineConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchEngine;
pub use memory::InMemoryEngine;
pub use opensearch::OpenSearchEngine;
pub use types::{SearchHit, SearchRequest, SearchResponse};
