//! Embedding provider trait and factory.

use civic_core::{AppError, AppResult, EmbeddingSettings};
use std::sync::Arc;

/// Maps text to a fixed-length numeric vector.
///
/// Deterministic for a fixed model. Failures surface as
/// [`AppError::Embedding`] and are never retried here.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts, one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create the embedding provider named in the settings.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    tracing::debug!(
        "Creating embedding provider: {} ({})",
        settings.provider,
        settings.model
    );

    // Same case-insensitive names that config validation accepts
    match settings.provider.trim().to_lowercase().as_str() {
        "trigram" => Ok(Arc::new(super::providers::trigram::TrigramProvider::new(
            settings.model.clone(),
            settings.dimensions,
        ))),

        "ollama" => Ok(Arc::new(super::providers::ollama::OllamaProvider::new(
            settings.model.clone(),
            settings.dimensions,
            settings.endpoint.clone(),
        )?)),

        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> EmbeddingSettings {
        EmbeddingSettings {
            provider: provider.to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }

    #[test]
    fn test_create_trigram_provider() {
        let provider = create_provider(&settings("trigram")).unwrap();
        assert_eq!(provider.provider_name(), "trigram");
        assert_eq!(provider.model_name(), "all-MiniLM-L6-v2");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn test_create_ollama_provider() {
        let provider = create_provider(&settings("ollama")).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let provider = create_provider(&settings("Ollama")).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        let provider = create_provider(&settings("TRIGRAM")).unwrap();
        assert_eq!(provider.provider_name(), "trigram");
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider(&settings("openai"));
        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider(&settings("trigram")).unwrap();
        let embedding = provider.embed("Sanjeevini eligibility").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }
}
