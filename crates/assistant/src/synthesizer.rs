//! Grounded answer generation and the confidence heuristic.

use civic_core::{AnswerPolicy, AppResult, ResponseMode};
use civic_knowledge::RetrievedUnit;
use civic_llm::{LlmClient, LlmRequest};
use civic_prompt::{build_prompt, load_prompt, PromptDefinition, ANSWER_PROMPT_ID, SYSTEM_PROMPT_ID};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Builds the combined prompt and calls the generative model.
///
/// Never fails outward: generation and prompt errors come back as an
/// `Error: ...` string, which the confidence heuristic then flags.
pub struct AnswerSynthesizer {
    client: Arc<dyn LlmClient>,
    model: String,
    domain: String,
    policy: AnswerPolicy,
    system_prompt: PromptDefinition,
    answer_prompt: PromptDefinition,
}

impl AnswerSynthesizer {
    /// Prompt definitions are resolved once here, so a broken override
    /// fails at startup instead of on the first question.
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        domain: impl Into<String>,
        policy: AnswerPolicy,
        workspace: &Path,
    ) -> AppResult<Self> {
        Ok(Self {
            client,
            model: model.into(),
            domain: domain.into(),
            policy,
            system_prompt: load_prompt(workspace, SYSTEM_PROMPT_ID)?,
            answer_prompt: load_prompt(workspace, ANSWER_PROMPT_ID)?,
        })
    }

    /// Answer `query` from the retrieved units.
    ///
    /// `prior_questions` are earlier user turns of the session, oldest first.
    pub async fn synthesize(
        &self,
        units: &[RetrievedUnit],
        query: &str,
        prior_questions: &[&str],
        mode: ResponseMode,
    ) -> String {
        let prompt = match self.render(units, query, prior_questions, mode) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Failed to build answer prompt: {}", e);
                return format!("Error: {}", e);
            }
        };

        tracing::debug!(
            "Generating answer with {} ({} context units)",
            self.client.provider_name(),
            units.len()
        );

        let request = LlmRequest::new(prompt, self.model.as_str());
        match self.client.complete(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }

    /// Apply the configured policy to an answer.
    pub fn is_insufficient(&self, answer: &str) -> bool {
        is_insufficient(answer, &self.policy)
    }

    fn render(
        &self,
        units: &[RetrievedUnit],
        query: &str,
        prior_questions: &[&str],
        mode: ResponseMode,
    ) -> AppResult<String> {
        let system = build_prompt(
            &self.system_prompt,
            HashMap::from([
                ("domain".to_string(), self.domain.clone()),
                ("mode".to_string(), mode.as_str().to_string()),
            ]),
        )?;

        let context = units
            .iter()
            .map(|r| r.unit.text.trim())
            .collect::<Vec<_>>()
            .join("\n\n");

        let answer = build_prompt(
            &self.answer_prompt,
            HashMap::from([
                ("system".to_string(), system),
                ("context".to_string(), context),
                ("query".to_string(), query.to_string()),
                ("conversation".to_string(), prior_questions.join("\n")),
            ]),
        )?;

        Ok(answer)
    }
}

/// An answer is insufficient when its trimmed length is below the minimum or
/// it contains any hedging phrase (case-insensitive).
pub fn is_insufficient(answer: &str, policy: &AnswerPolicy) -> bool {
    if answer.trim().chars().count() < policy.min_answer_length {
        return true;
    }

    let lower = answer.to_lowercase();
    policy
        .hedging_phrases
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .any(|p| lower.contains(&p))
}
