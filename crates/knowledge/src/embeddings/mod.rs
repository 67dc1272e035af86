//! Embedding providers.
//!
//! One provider is chosen at startup and shared by index construction and
//! query-time retrieval, so both sides always use the same model.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
