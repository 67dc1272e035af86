//! Web search client abstraction.

use crate::types::SearchResult;
use civic_core::AppResult;

/// Trait for web search providers.
///
/// A failed call surfaces immediately as `AppError::Search`; there is no retry.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Get the provider name (e.g., "serpapi").
    fn provider_name(&self) -> &str;

    /// Run a search for `query`.
    async fn search(&self, query: &str) -> AppResult<SearchResult>;
}
