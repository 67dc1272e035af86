//! Generative model integration for Civic Help.
//!
//! This crate provides a provider-agnostic abstraction over text generation.
//! Callers build an [`LlmRequest`] and hand it to any [`LlmClient`]; the
//! factory picks the implementation from configuration.
//!
//! # Providers
//! - **Gemini**: Google Generative Language REST API (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use civic_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Which schemes cover farmers?", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
pub use types::ProviderType;
