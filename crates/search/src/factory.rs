//! Search provider factory.

use crate::client::SearchClient;
use crate::providers::SerpApiClient;
use civic_core::{AppError, AppResult, SearchSettings};
use std::sync::Arc;

/// Create a search client from the configured settings.
///
/// A missing API key is not an error here: web search is optional, so the
/// client reports it when a search is actually attempted.
pub fn create_search_client(settings: &SearchSettings) -> AppResult<Arc<dyn SearchClient>> {
    match settings.provider.to_lowercase().as_str() {
        "serpapi" => {
            let client = match settings.endpoint.as_deref() {
                Some(url) => SerpApiClient::with_base_url(url, settings.api_key.clone()),
                None => SerpApiClient::new(settings.api_key.clone()),
            };
            Ok(Arc::new(client))
        }
        other => Err(AppError::Config(format!(
            "Unknown search provider: {}. Supported: serpapi",
            other
        ))),
    }
}
