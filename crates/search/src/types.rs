//! Search result types and payload normalisation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchResult {
    /// Question/answer groups with source links
    Structured(Vec<QnaGroup>),

    /// Anything else, rendered as text
    Opaque(String),
}

/// A related question with its answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QnaGroup {
    #[serde(default)]
    pub question: Option<String>,

    #[serde(default)]
    pub answers: Vec<QnaAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnaAnswer {
    #[serde(default)]
    pub answer: String,

    #[serde(default)]
    pub source_links: Vec<SourceLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLink {
    #[serde(default)]
    pub hyper_link: Option<String>,

    #[serde(default)]
    pub hyper_link_text: Option<String>,
}

/// `RelatedQnA[].Data` as emitted by some providers.
#[derive(Debug, Deserialize)]
struct RelatedQnaItem {
    #[serde(rename = "Data", default)]
    data: RelatedQnaData,
}

#[derive(Debug, Default, Deserialize)]
struct RelatedQnaData {
    #[serde(default)]
    question: Option<String>,

    #[serde(rename = "qnAAnswers", default)]
    answers: Vec<QnaAnswer>,
}

impl SearchResult {
    /// Normalise a raw provider payload.
    ///
    /// `groups` and `RelatedQnA` arrays become [`SearchResult::Structured`];
    /// everything else is reduced to the most useful text it carries.
    pub fn from_payload(payload: Value) -> Self {
        if let Some(groups) = payload.get("groups").filter(|g| g.is_array()) {
            match serde_json::from_value::<Vec<QnaGroup>>(groups.clone()) {
                Ok(groups) => return Self::Structured(groups),
                Err(e) => tracing::debug!("Ignoring malformed groups payload: {}", e),
            }
        }

        if let Some(items) = payload.get("RelatedQnA").filter(|g| g.is_array()) {
            match serde_json::from_value::<Vec<RelatedQnaItem>>(items.clone()) {
                Ok(items) => {
                    return Self::Structured(
                        items
                            .into_iter()
                            .map(|item| QnaGroup {
                                question: item.data.question,
                                answers: item.data.answers,
                            })
                            .collect(),
                    )
                }
                Err(e) => tracing::debug!("Ignoring malformed RelatedQnA payload: {}", e),
            }
        }

        Self::Opaque(payload_text(&payload))
    }
}

/// Pick the answer text out of an unstructured payload, falling back to raw JSON.
fn payload_text(payload: &Value) -> String {
    if let Some(text) = payload.as_str() {
        return text.to_string();
    }

    if let Some(answer_box) = payload.get("answer_box") {
        let candidate = answer_box
            .get("answer")
            .and_then(Value::as_str)
            .or_else(|| answer_box.get("snippet").and_then(Value::as_str))
            .or_else(|| {
                answer_box
                    .get("snippet_highlighted_words")
                    .and_then(|w| w.get(0))
                    .and_then(Value::as_str)
            });
        if let Some(text) = candidate {
            return text.to_string();
        }
    }

    if let Some(description) = payload
        .get("knowledge_graph")
        .and_then(|kg| kg.get("description"))
        .and_then(Value::as_str)
    {
        return description.to_string();
    }

    if let Some(snippet) = payload
        .get("organic_results")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("snippet"))
        .and_then(Value::as_str)
    {
        return snippet.to_string();
    }

    payload.to_string()
}
