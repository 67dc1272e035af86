//! Offline embedding provider built from hashed word and character trigram features.

use crate::embeddings::provider::EmbeddingProvider;
use civic_core::AppResult;
use std::collections::{HashMap, HashSet};

const STOP_WORDS: [&str; 32] = [
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "what", "who",
];

/// Trigram-based embedding provider for local, offline operation.
///
/// Vectors are deterministic and content-dependent: texts sharing words land
/// close together, which is enough to rank scheme records without a model
/// server. Not semantically aware.
#[derive(Debug)]
pub struct TrigramProvider {
    model: String,
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(model: String, dimensions: usize) -> Self {
        Self { model, dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        if self.dimensions == 0 {
            return embedding;
        }

        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        let lower = text.to_lowercase();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2 && !stop_words.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let freq = *freq as f32;

            // Whole word carries most of the weight
            embedding[self.bucket(word.as_bytes())] += freq;

            // Padded trigrams so prefixes and suffixes are distinguishable
            let padded: Vec<char> = std::iter::once('^')
                .chain(word.chars())
                .chain(std::iter::once('$'))
                .collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[self.bucket(trigram.as_bytes())] += freq.sqrt() * 0.5;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }

    /// FNV-1a hash folded into the vector length.
    fn bucket(&self, bytes: &[u8]) -> usize {
        let hash = bytes.iter().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
        });
        (hash % self.dimensions as u64) as usize
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
