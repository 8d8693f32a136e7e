//! OpenSearch query builders.

use serde_json::{json, Value};

use crate::types::SearchRequest;

/// Build a match-all search body for one page of an index.
///
/// `track_total_hits` is always on so the reported total is exact rather
/// than the engine's default lower bound of 10,000.
pub fn build_match_all_query(request: &SearchRequest) -> Value {
    json!({
        "from": request.from,
        "size": request.size,
        "track_total_hits": true,
        "query": {
            "match_all": {}
        }
    })
}
