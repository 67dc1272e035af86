//! Sequences classification, retrieval, synthesis and fallback per query.

use crate::classifier::RelevanceClassifier;
use crate::fallback::{composite_message, refusal_message, Route, WebFallbackGate, NO_DATA_MESSAGE};
use crate::session::{Role, Session};
use crate::synthesizer::AnswerSynthesizer;
use civic_core::{AppConfig, ResponseMode};
use civic_knowledge::KnowledgeIndex;
use serde::Serialize;
use std::sync::Arc;

/// A displayable answer and the branch that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub content: String,
    pub route: Route,
}

impl Reply {
    fn new(route: Route, content: String) -> Self {
        Self { content, route }
    }
}

/// The assistant shared by every session of the process.
///
/// Holds no per-query mutable state; everything conversational lives in the
/// [`Session`] passed to [`Assistant::respond`].
pub struct Assistant {
    classifier: RelevanceClassifier,
    index: Arc<KnowledgeIndex>,
    synthesizer: AnswerSynthesizer,
    gate: WebFallbackGate,
    domain: String,
    top_k: usize,
    fallback_default: bool,
    mode_default: ResponseMode,
}

impl Assistant {
    pub fn new(
        config: &AppConfig,
        index: Arc<KnowledgeIndex>,
        synthesizer: AnswerSynthesizer,
        gate: WebFallbackGate,
    ) -> Self {
        Self {
            classifier: RelevanceClassifier::from_settings(&config.domain),
            index,
            synthesizer,
            gate,
            domain: config.domain.name.clone(),
            top_k: config.retrieval.top_k,
            fallback_default: config.fallback_enabled,
            mode_default: config.response_mode,
        }
    }

    /// A fresh session using the configured fallback and mode defaults.
    pub fn new_session(&self) -> Session {
        Session::new(self.fallback_default, self.mode_default)
    }

    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }

    /// Answer one query and record both turns in the session.
    ///
    /// Always returns a displayable reply; external failures are rendered
    /// into the content.
    pub async fn respond(&self, session: &mut Session, query: &str) -> Reply {
        let prior: Vec<String> = session
            .user_questions()
            .into_iter()
            .map(str::to_string)
            .collect();
        session.push(Role::User, query);

        let reply = self.answer(session, query, &prior).await;
        tracing::info!(route = %reply.route, "Replied");

        session.push(Role::Assistant, reply.content.clone());
        reply
    }

    async fn answer(&self, session: &Session, query: &str, prior: &[String]) -> Reply {
        let fallback = session.fallback_enabled;

        let in_domain = self.classifier.is_in_domain(query);
        tracing::debug!(in_domain, fallback, "Classified query");

        if !in_domain {
            let route = Route::decide(false, 0, false, fallback);
            return match route {
                Route::OffTopicWeb => Reply::new(route, self.gate.search(query).await),
                _ => Reply::new(route, refusal_message(&self.domain)),
            };
        }

        let units = match self.index.retrieve(query, self.top_k).await {
            Ok(units) => units,
            Err(e) => {
                tracing::warn!("Query embedding failed: {}", e);
                return Reply::new(
                    Route::RetrievalFailed,
                    format!(
                        "Sorry, I couldn't search the scheme data right now ({}). Please try again later.",
                        e
                    ),
                );
            }
        };

        if units.is_empty() {
            let route = Route::decide(true, 0, false, fallback);
            return match route {
                Route::NoDataWeb => Reply::new(route, self.gate.search(query).await),
                _ => Reply::new(route, NO_DATA_MESSAGE.to_string()),
            };
        }

        let prior: Vec<&str> = prior.iter().map(String::as_str).collect();
        let answer = self
            .synthesizer
            .synthesize(&units, query, &prior, session.response_mode)
            .await;
        let insufficient = self.synthesizer.is_insufficient(&answer);

        let route = Route::decide(true, units.len(), insufficient, fallback);
        match route {
            Route::WeakAnswerWithWeb => {
                let web = self.gate.search(query).await;
                Reply::new(route, composite_message(&answer, &web))
            }
            _ => Reply::new(route, answer),
        }
    }
}
