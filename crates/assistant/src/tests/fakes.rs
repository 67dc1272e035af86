//! Fake collaborators and a harness wiring them into an [`Assistant`].

use crate::{Assistant, AnswerSynthesizer, WebFallbackGate};
use civic_core::{AppConfig, AppError, AppResult};
use civic_knowledge::embeddings::providers::trigram::TrigramProvider;
use civic_knowledge::{parse_corpus, EmbeddingProvider, KnowledgeIndex};
use civic_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use civic_search::{SearchClient, SearchResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const CORPUS: &str = "1.
scheme_name: Sanjeevini
benefit: Livelihood support and bank linkage for self-help groups
eligibility: Women in rural Karnataka who are members of self-help groups
category: Rural Development
region: Karnataka
source_url: https://sanjeevini.karnataka.gov.in
2.
scheme_name: Gruha Jyothi
benefit: Free household electricity up to 200 units per month
eligibility: Domestic consumers in Karnataka
3.
scheme_name: Shakti
benefit: Free bus travel for women in state transport buses
";

pub const GOOD_ANSWER: &str =
    "Sanjeevini is open to women in rural Karnataka who are members of self-help groups.";
pub const WEAK_ANSWER: &str = "Not sure.";

pub struct FakeLlm {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::answering("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for FakeLlm {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        match &self.reply {
            Ok(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 10),
            }),
            Err(message) => Err(AppError::Generation(message.clone())),
        }
    }
}

pub struct FakeSearch {
    result: Result<SearchResult, String>,
    pub calls: AtomicUsize,
}

impl FakeSearch {
    pub fn returning(result: SearchResult) -> Self {
        Self {
            result: Ok(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchClient for FakeSearch {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, _query: &str) -> AppResult<SearchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(AppError::Search)
    }
}

/// Trigram embeddings that can be switched off after the index is built.
#[derive(Debug)]
pub struct SwitchableEmbedder {
    inner: TrigramProvider,
    pub down: AtomicBool,
}

#[async_trait::async_trait]
impl EmbeddingProvider for SwitchableEmbedder {
    fn provider_name(&self) -> &str {
        "switchable"
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Embedding("embedding service unreachable".to_string()));
        }
        self.inner.embed_batch(texts).await
    }
}

pub struct Harness {
    pub assistant: Assistant,
    pub llm: Arc<FakeLlm>,
    pub search: Arc<FakeSearch>,
    pub embedder: Arc<SwitchableEmbedder>,
    _workspace: TempDir,
}

pub fn web_result() -> SearchResult {
    SearchResult::Opaque("Paris: light rain, 14°C".to_string())
}

pub async fn harness(corpus: &str, llm: FakeLlm, search: FakeSearch) -> Harness {
    harness_with_floor(corpus, llm, search, None).await
}

/// Like [`harness`], with a `minSimilarity` floor on retrieval.
pub async fn harness_with_floor(
    corpus: &str,
    llm: FakeLlm,
    search: FakeSearch,
    min_similarity: Option<f32>,
) -> Harness {
    let workspace = TempDir::new().unwrap();
    let config = AppConfig {
        workspace: workspace.path().to_path_buf(),
        ..AppConfig::default()
    };

    let llm = Arc::new(llm);
    let search = Arc::new(search);
    let embedder = Arc::new(SwitchableEmbedder {
        inner: TrigramProvider::new("trigram-v1".to_string(), 256),
        down: AtomicBool::new(false),
    });

    let units = parse_corpus(corpus).iter().map(|r| r.to_unit()).collect();
    let index = KnowledgeIndex::build(units, embedder.clone(), min_similarity)
        .await
        .unwrap();

    let synthesizer = AnswerSynthesizer::new(
        llm.clone(),
        "fake-model",
        config.domain.name.clone(),
        config.answer.clone(),
        workspace.path(),
    )
    .unwrap();

    let assistant = Assistant::new(
        &config,
        Arc::new(index),
        synthesizer,
        WebFallbackGate::new(search.clone()),
    );

    Harness {
        assistant,
        llm,
        search,
        embedder,
        _workspace: workspace,
    }
}
