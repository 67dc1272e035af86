//! SerpApi web search provider.
//!
//! API: https://serpapi.com/search-api

use crate::client::SearchClient;
use crate::types::SearchResult;
use civic_core::{AppError, AppResult};
use serde_json::Value;

const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com";

/// SerpApi client.
pub struct SerpApiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl SerpApiClient {
    /// Create a new SerpApi client against the public endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_SERPAPI_URL, api_key)
    }

    /// Create a new SerpApi client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Turn a response body into a result, honouring SerpApi's `error` field.
    fn parse_body(&self, body: &str) -> AppResult<SearchResult> {
        let payload: Value = serde_json::from_str(body)
            .map_err(|e| AppError::Search(format!("Failed to parse SerpApi response: {}", e)))?;

        if let Some(error) = payload.get("error").and_then(Value::as_str) {
            return Err(AppError::Search(format!("SerpApi error: {}", error)));
        }

        Ok(SearchResult::from_payload(payload))
    }
}

#[async_trait::async_trait]
impl SearchClient for SerpApiClient {
    fn provider_name(&self) -> &str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> AppResult<SearchResult> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Search("Web search API key is not configured (set SERPAPI_KEY)".to_string())
        })?;

        tracing::info!("Searching the web via SerpApi");
        tracing::debug!("Search query: {}", query);

        // The key travels in the query string; errors must not echo the URL.
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("engine", "google"), ("q", query), ("api_key", api_key)])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("SerpApi request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                AppError::Search(format!("Failed to read SerpApi response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            return Err(AppError::Search(format!(
                "SerpApi error ({}): {}",
                status, body
            )));
        }

        self.parse_body(&body)
    }
}
