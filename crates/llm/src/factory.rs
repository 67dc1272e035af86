//! LLM provider factory.
//!
//! Resolves the configured provider name into a concrete client.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use crate::types::ProviderType;
use civic_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required for Gemini)
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::Gemini => {
            let api_key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| AppError::Config("Gemini provider requires API key".to_string()))?;
            let client = match endpoint {
                Some(url) => GeminiClient::with_base_url(url, api_key),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_gemini_client() {
        let client = create_client("gemini", None, Some("key")).unwrap();
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        match create_client("gemini", None, Some("  ")) {
            Err(err) => assert!(err.to_string().contains("Gemini provider requires API key")),
            Ok(_) => panic!("Expected error for Gemini without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
