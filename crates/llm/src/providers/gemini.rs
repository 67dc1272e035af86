//! Gemini LLM provider implementation.
//!
//! Uses the Generative Language REST API:
//! `POST {base}/v1beta/models/{model}:generateContent` with the key in the
//! `X-goog-api-key` header.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use civic_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini LLM client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_GEMINI_URL, api_key)
    }

    /// Create a new Gemini client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// The whole prompt goes out as one user part.
    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
        }
    }

    /// Extract `candidates[0].content.parts[0].text` from a raw response body.
    fn parse_response(&self, model: &str, body: &str) -> AppResult<LlmResponse> {
        let parsed: GeminiResponse = serde_json::from_str(body).map_err(|e| {
            AppError::Generation(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                AppError::Generation(format!("Unexpected Gemini response format: {}", body))
            })?;

        let usage = parsed
            .usage_metadata
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            content: text,
            model: model.to_string(),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini ({})", request.model);
        tracing::debug!("Request: {:?}", request);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("X-goog-api-key", &self.api_key)
            .json(&self.to_gemini_request(request))
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Gemini API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Generation(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let parsed = self.parse_response(&request.model, &body)?;
        tracing::info!(
            "Received completion from Gemini ({} tokens)",
            parsed.usage.total_tokens
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::with_base_url("http://localhost:8080/", "key");
        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let client = GeminiClient::new("key");
        let request = LlmRequest::new("Who runs NRLM?", "gemini-2.0-flash");

        let json = serde_json::to_value(client.to_gemini_request(&request)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "Who runs NRLM?"}]}]})
        );
    }

    #[test]
    fn test_parse_response() {
        let client = GeminiClient::new("key");
        let body = r#"{
            "candidates": [{"content": {"parts": [{"text": "Sanjeevini supports rural livelihoods."}], "role": "model"}}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 6, "totalTokenCount": 16}
        }"#;

        let response = client.parse_response("gemini-2.0-flash", body).unwrap();
        assert_eq!(response.content, "Sanjeevini supports rural livelihoods.");
        assert_eq!(response.usage.total_tokens, 16);
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let client = GeminiClient::new("key");
        let err = client
            .parse_response("gemini-2.0-flash", r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
        assert!(err.to_string().contains("Unexpected Gemini response format"));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let client = GeminiClient::new("key");
        assert!(client.parse_response("m", "<html>").is_err());
    }
}
