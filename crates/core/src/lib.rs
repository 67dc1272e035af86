//! Civic Help Core Library
//!
//! This crate provides the foundational utilities shared by every Civic Help crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management and the tunable answer/retrieval policy

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{
    AnswerPolicy, AppConfig, DomainSettings, EmbeddingSettings, ResponseMode, RetrievalSettings,
    SearchSettings,
};
pub use error::{AppError, AppResult};
