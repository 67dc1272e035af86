//! The loaded knowledge base: units, their embeddings and query-time retrieval.

use crate::embeddings::EmbeddingProvider;
use crate::types::{RetrievableUnit, RetrievedUnit};
use crate::vector_index::{InMemoryIndex, VectorIndex};
use civic_core::{AppError, AppResult};
use std::sync::Arc;

/// Read-only index built once at startup and shared by all sessions.
pub struct KnowledgeIndex {
    provider: Arc<dyn EmbeddingProvider>,
    index: Box<dyn VectorIndex>,
    min_similarity: Option<f32>,
}

impl std::fmt::Debug for KnowledgeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeIndex")
            .field("provider", &self.provider.provider_name())
            .field("units", &self.index.len())
            .field("min_similarity", &self.min_similarity)
            .finish()
    }
}

impl KnowledgeIndex {
    /// Embed every unit and build the index.
    ///
    /// Any embedding failure aborts the build; no partial index is returned.
    pub async fn build(
        units: Vec<RetrievableUnit>,
        provider: Arc<dyn EmbeddingProvider>,
        min_similarity: Option<f32>,
    ) -> AppResult<Self> {
        let mut index = InMemoryIndex::new();

        if !units.is_empty() {
            tracing::info!(
                "Embedding {} units with {} ({})",
                units.len(),
                provider.provider_name(),
                provider.model_name()
            );

            let texts: Vec<String> = units.iter().map(|u| u.text.clone()).collect();
            let embeddings = provider.embed_batch(&texts).await?;

            if embeddings.len() != units.len() {
                return Err(AppError::Embedding(format!(
                    "Provider returned {} embeddings for {} units",
                    embeddings.len(),
                    units.len()
                )));
            }

            for (unit, embedding) in units.into_iter().zip(embeddings) {
                index.insert(unit, embedding)?;
            }
        } else {
            tracing::warn!("Knowledge index is empty; every in-domain query will miss");
        }

        Ok(Self {
            provider,
            index: Box::new(index),
            min_similarity,
        })
    }

    /// Return up to `k` units most similar to the query, best first.
    ///
    /// Units below the configured similarity floor are dropped.
    pub async fn retrieve(&self, query: &str, k: usize) -> AppResult<Vec<RetrievedUnit>> {
        if self.index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(query).await?;
        let mut results = self.index.search(&query_embedding, k)?;

        if let Some(floor) = self.min_similarity {
            results.retain(|r| r.score >= floor);
        }

        tracing::debug!(
            "Retrieved {} units (top score {:?})",
            results.len(),
            results.first().map(|r| r.score)
        );

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_corpus;
    use crate::embeddings::providers::trigram::TrigramProvider;

    const CORPUS: &str = "1.
scheme_name: Sanjeevini
eligibility: Women in rural Karnataka belonging to self-help groups
2.
scheme_name: Gruha Jyothi
benefit: Free household electricity up to 200 units
3.
scheme_name: Shakti
benefit: Free bus travel for women in state transport buses
4.
scheme_name: Yuva Nidhi
benefit: Unemployment allowance for graduates
";

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait::async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "none"
        }

        fn dimensions(&self) -> usize {
            4
        }

        async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Err(AppError::Embedding("model unavailable".to_string()))
        }
    }

    fn units() -> Vec<RetrievableUnit> {
        parse_corpus(CORPUS).iter().map(|r| r.to_unit()).collect()
    }

    fn trigram() -> Arc<dyn EmbeddingProvider> {
        Arc::new(TrigramProvider::new("trigram-v1".to_string(), 384))
    }

    #[tokio::test]
    async fn test_retrieve_ranks_matching_scheme_first() {
        let index = KnowledgeIndex::build(units(), trigram(), None).await.unwrap();
        assert_eq!(index.len(), 4);

        let results = index
            .retrieve("What is the eligibility for Sanjeevini?", 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].unit.source, "Sanjeevini");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_corpus_size() {
        let index = KnowledgeIndex::build(units(), trigram(), None).await.unwrap();
        assert_eq!(index.retrieve("scheme", 10).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let index = KnowledgeIndex::build(Vec::new(), trigram(), None).await.unwrap();
        assert!(index.is_empty());
        assert!(index.retrieve("Sanjeevini", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_min_similarity_filters_weak_matches() {
        let index = KnowledgeIndex::build(units(), trigram(), Some(0.99))
            .await
            .unwrap();
        assert!(index
            .retrieve("weather forecast for Paris", 3)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_build_fails_fast_on_embedding_error() {
        let result = KnowledgeIndex::build(units(), Arc::new(FailingProvider), None).await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }
}
