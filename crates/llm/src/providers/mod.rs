//! Generative provider implementations.

pub mod gemini;
pub mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
