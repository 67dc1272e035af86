//! Web fallback decision table and web result formatting.

use civic_search::{SearchClient, SearchResult};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

const WEB_BANNER: &str = "🌐 Here's what I found online:\n\n";

/// Returned when retrieval finds nothing and web search is off.
pub const NO_DATA_MESSAGE: &str = "Sorry, I couldn’t find any relevant scheme data for your query.";

/// Introduces a weak local answer that is followed by web results.
pub const INSUFFICIENT_PREFIX: &str =
    "That does not belong in my stored data, but I can fetch you the results from the WEB.";

/// Which branch produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Out of domain; web result only
    OffTopicWeb,
    /// Out of domain; fixed refusal
    OffTopicRefusal,
    /// Local answer returned unchanged
    Answered,
    /// Weak local answer followed by web result
    WeakAnswerWithWeb,
    /// Weak local answer returned unchanged
    WeakAnswer,
    /// Nothing retrieved; web result only
    NoDataWeb,
    /// Nothing retrieved; fixed message
    NoData,
    /// The query could not be embedded
    RetrievalFailed,
}

impl Route {
    /// First matching row of the fallback table.
    ///
    /// `insufficient` is only consulted when the query is in domain and
    /// something was retrieved.
    pub fn decide(
        in_domain: bool,
        retrieved_count: usize,
        insufficient: bool,
        fallback_enabled: bool,
    ) -> Self {
        match (in_domain, retrieved_count > 0, insufficient, fallback_enabled) {
            (false, _, _, true) => Self::OffTopicWeb,
            (false, _, _, false) => Self::OffTopicRefusal,
            (true, true, false, _) => Self::Answered,
            (true, true, true, true) => Self::WeakAnswerWithWeb,
            (true, true, true, false) => Self::WeakAnswer,
            (true, false, _, true) => Self::NoDataWeb,
            (true, false, _, false) => Self::NoData,
        }
    }

    pub fn performs_search(self) -> bool {
        matches!(self, Self::OffTopicWeb | Self::WeakAnswerWithWeb | Self::NoDataWeb)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OffTopicWeb => "off_topic_web",
            Self::OffTopicRefusal => "off_topic_refusal",
            Self::Answered => "answered",
            Self::WeakAnswerWithWeb => "weak_answer_with_web",
            Self::WeakAnswer => "weak_answer",
            Self::NoDataWeb => "no_data_web",
            Self::NoData => "no_data",
            Self::RetrievalFailed => "retrieval_failed",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refusal for out-of-domain queries when web search is off.
pub fn refusal_message(domain: &str) -> String {
    format!("Sorry, I can only answer questions related to {}.", domain)
}

/// Weak local answer first, then the web result.
pub fn composite_message(answer: &str, web: &str) -> String {
    format!(
        "{}\n\n{}\n\n🔍 Web Search Result:\n{}",
        INSUFFICIENT_PREFIX, answer, web
    )
}

/// Render a search result for display.
///
/// Structured groups become a bold question, the first answer and a link to
/// that answer's first source. Groups without a question or answers are
/// skipped. Opaque payloads are shown as-is.
pub fn format_web_result(result: &SearchResult) -> String {
    let body = match result {
        SearchResult::Structured(groups) => {
            let mut out = String::new();
            for group in groups {
                let (Some(question), Some(first)) = (
                    group.question.as_deref().filter(|q| !q.is_empty()),
                    group.answers.first(),
                ) else {
                    continue;
                };

                let link = first.source_links.first();
                let href = link.and_then(|l| l.hyper_link.as_deref()).unwrap_or("");
                let label = link
                    .and_then(|l| l.hyper_link_text.as_deref())
                    .unwrap_or("Source");

                out.push_str(&format!(
                    "**{}**\n{}\n🔗 [{}]({})\n\n",
                    question, first.answer, label, href
                ));
            }
            out
        }
        SearchResult::Opaque(text) => text.clone(),
    };

    format!("{}{}", WEB_BANNER, body)
}

/// Runs web searches and turns any outcome into displayable text.
pub struct WebFallbackGate {
    client: Arc<dyn SearchClient>,
}

impl WebFallbackGate {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }

    /// Search and format. Failures become an `Error: ...` string.
    pub async fn search(&self, query: &str) -> String {
        tracing::info!("Falling back to web search via {}", self.client.provider_name());

        match self.client.search(query).await {
            Ok(result) => format_web_result(&result),
            Err(e) => {
                tracing::warn!("Web search failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}
