//! Vector index abstraction and the in-memory implementation.

use crate::types::{RetrievableUnit, RetrievedUnit};
use civic_core::{AppError, AppResult};

/// Trait for vector index backends.
pub trait VectorIndex: Send + Sync {
    /// Add a unit with its embedding.
    fn insert(&mut self, unit: RetrievableUnit, embedding: Vec<f32>) -> AppResult<()>;

    /// Return up to `top_k` units ordered by descending cosine similarity.
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<RetrievedUnit>>;

    /// Number of stored units.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct IndexedUnit {
    unit: RetrievableUnit,
    embedding: Vec<f32>,
}

/// Exhaustive cosine-similarity search over vectors held in memory.
///
/// Every stored vector must have the same length. Equal scores keep
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    entries: Vec<IndexedUnit>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length shared by every stored vector, if any are stored.
    pub fn dimensions(&self) -> Option<usize> {
        self.entries.first().map(|e| e.embedding.len())
    }
}

impl VectorIndex for InMemoryIndex {
    fn insert(&mut self, unit: RetrievableUnit, embedding: Vec<f32>) -> AppResult<()> {
        if let Some(expected) = self.dimensions() {
            if embedding.len() != expected {
                return Err(AppError::Embedding(format!(
                    "Dimension mismatch: expected {}, got {}",
                    expected,
                    embedding.len()
                )));
            }
        }

        self.entries.push(IndexedUnit { unit, embedding });
        Ok(())
    }

    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<RetrievedUnit>> {
        if let Some(expected) = self.dimensions() {
            if query_embedding.len() != expected {
                return Err(AppError::Embedding(format!(
                    "Query dimension mismatch: expected {}, got {}",
                    expected,
                    query_embedding.len()
                )));
            }
        }

        let mut scored: Vec<RetrievedUnit> = self
            .entries
            .iter()
            .map(|entry| RetrievedUnit {
                unit: entry.unit.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        // sort_by is stable, so ties stay in insertion order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cosine similarity; zero when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
