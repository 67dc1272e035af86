//! Ollama embedding provider.
//!
//! Calls the local `/api/embeddings` endpoint once per text. Texts are sent
//! sequentially and failures are reported immediately without retrying.

use crate::embeddings::provider::EmbeddingProvider;
use async_trait::async_trait;
use civic_core::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBEDDING_ENDPOINT: &str = "/api/embeddings";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Ollama embedding provider using the local API.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    /// Model name (e.g., "nomic-embed-text")
    model: String,
    dimensions: usize,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl OllamaProvider {
    /// Create a provider. No request is made until the first embedding.
    pub fn new(model: String, dimensions: usize, base_url: Option<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Embedding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            dimensions,
        })
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn embed_single(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to reach Ollama at {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);

            return Err(AppError::Embedding(format!(
                "Ollama API error ({}): {}",
                status, message
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse Ollama response: {}", e)))?;

        if body.embedding.is_empty() {
            return Err(AppError::Embedding(format!(
                "Ollama model '{}' returned an empty embedding",
                self.model
            )));
        }

        debug!("Generated {} dimensional embedding", body.embedding.len());
        Ok(body.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[instrument(skip(self, texts), fields(batch_size = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        // No batch endpoint; one request per text
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_single(text).await?);
        }
        Ok(embeddings)
    }
}
