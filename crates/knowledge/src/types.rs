//! Knowledge type definitions.

use serde::{Deserialize, Serialize};

/// A piece of text a query can match against.
///
/// Created once at load time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievableUnit {
    /// Text that is embedded and handed to the synthesizer
    pub text: String,

    /// Where the text came from (scheme name or `file#window`)
    pub source: String,
}

impl RetrievableUnit {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A unit returned by retrieval together with its cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedUnit {
    pub unit: RetrievableUnit,

    /// Cosine similarity to the query (-1.0 to 1.0)
    pub score: f32,
}
