//! Error types for Civic Help.
//!
//! This module defines a unified error enum covering configuration, embedding,
//! generation, web search, knowledge and prompt failures.

use thiserror::Error;

/// Unified error type for Civic Help.
///
/// Only `Config` is allowed to halt the process. Generation and search failures
/// are turned into chat messages by the assistant; embedding failures are fatal
/// while building the index and recoverable at query time.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding provider unreachable or returned a malformed response
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Generative model call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Web search call failed
    #[error("Search error: {0}")]
    Search(String),

    /// Corpus and index errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
