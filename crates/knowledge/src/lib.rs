//! Scheme knowledge base.
//!
//! Turns the delimited scheme corpus (and optional free-text documents) into
//! retrievable units, embeds them once at startup and answers nearest-neighbour
//! queries against the resulting in-memory index.

pub mod chunker;
pub mod corpus;
pub mod documents;
pub mod embeddings;
pub mod index;
pub mod types;
pub mod vector_index;

// Re-export commonly used types
pub use corpus::{load_corpus, parse_corpus, SchemeRecord, FIELD_NAMES, NOT_SPECIFIED};
pub use documents::document_units;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::KnowledgeIndex;
pub use types::{RetrievableUnit, RetrievedUnit};
pub use vector_index::{InMemoryIndex, VectorIndex};
