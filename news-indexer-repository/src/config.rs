//! Configuration types for connecting to the search engine.

use std::time::Duration;

/// Default OpenSearch URL.
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";

/// Transport-level configuration for the search engine connection.
///
/// The index client itself defines no timeout policy; callers that need one
/// set it here and it is applied to every request by the transport.
#[derive(Debug, Clone)]
pub struct SearchEngineConfig {
    /// The search engine URL (e.g., "http://localhost:9200").
    pub url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for SearchEngineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENGINE_URL.to_string(),
            timeout: None,
        }
    }
}

impl SearchEngineConfig {
    /// Create a config for the given URL with no timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
