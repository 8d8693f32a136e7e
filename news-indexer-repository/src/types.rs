//! Request and response types for search engine operations.

/// Default page size for a search, matching the engine's own default.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A page of a match-all search over one index.
///
/// The facade never builds relevance queries; searches exist so callers can
/// observe how many documents an index holds after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    /// Offset of the first hit to return.
    pub from: usize,
    /// Maximum number of hits to return.
    pub size: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    /// Create a request for the page starting at `from` with at most `size` hits.
    pub fn page(from: usize, size: usize) -> Self {
        Self { from, size }
    }
}

/// A single document returned by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// The document type the hit was indexed under.
    pub doc_type: String,
    /// The document id within its type.
    pub id: String,
    /// The stored body, exactly as it was indexed.
    pub source: Vec<u8>,
}

/// Result of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    /// Total number of documents matching the search, independent of paging.
    pub total_hits: u64,
    /// The hits on the requested page.
    pub hits: Vec<SearchHit>,
}
