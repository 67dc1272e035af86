//! Query pipeline for Civic Help.
//!
//! Each query is classified, matched against the knowledge index, answered by
//! the generative model and, when local knowledge falls short, supplemented
//! with a web search. The conversation transcript lives in a [`Session`]
//! owned by the caller.

pub mod bootstrap;
pub mod classifier;
pub mod fallback;
pub mod orchestrator;
pub mod session;
pub mod synthesizer;

#[cfg(test)]
mod tests;

pub use bootstrap::{build_assistant, load_units};
pub use classifier::RelevanceClassifier;
pub use fallback::{format_web_result, Route, WebFallbackGate};
pub use orchestrator::{Assistant, Reply};
pub use session::{ConversationTurn, Role, Session};
pub use synthesizer::{is_insufficient, AnswerSynthesizer};
