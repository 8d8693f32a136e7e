//! Error types for the news indexer repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
