//! Startup wiring: config in, ready [`Assistant`] out.

use crate::fallback::WebFallbackGate;
use crate::orchestrator::Assistant;
use crate::synthesizer::AnswerSynthesizer;
use civic_core::{AppConfig, AppResult};
use civic_knowledge::{create_provider, document_units, load_corpus, KnowledgeIndex, RetrievableUnit};
use std::sync::Arc;

/// Scheme units followed by free-text document windows.
pub fn load_units(config: &AppConfig) -> AppResult<Vec<RetrievableUnit>> {
    let mut units: Vec<RetrievableUnit> = load_corpus(&config.corpus_file())?
        .iter()
        .map(|record| record.to_unit())
        .collect();

    let documents = config.document_paths();
    if !documents.is_empty() {
        let windows = document_units(&documents, &config.retrieval)?;
        tracing::info!("Loaded {} document windows", windows.len());
        units.extend(windows);
    }

    Ok(units)
}

/// Build every component from a validated config.
///
/// Fails on configuration problems and on any embedding failure while
/// indexing; nothing is returned half-built.
pub async fn build_assistant(config: &AppConfig) -> AppResult<Assistant> {
    let llm = civic_llm::create_client(
        &config.provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )?;
    let search = civic_search::create_search_client(&config.search)?;
    let embedder = create_provider(&config.embedding)?;

    let synthesizer = AnswerSynthesizer::new(
        llm,
        config.model.clone(),
        config.domain.name.clone(),
        config.answer.clone(),
        &config.workspace,
    )?;

    let units = load_units(config)?;
    let index = KnowledgeIndex::build(units, embedder, config.retrieval.min_similarity).await?;
    tracing::info!("Knowledge index ready with {} units", index.len());

    Ok(Assistant::new(
        config,
        Arc::new(index),
        synthesizer,
        WebFallbackGate::new(search),
    ))
}
