//! Per-session conversation state.

use civic_core::ResponseMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// Transcript plus the toggles a user can flip mid-conversation.
///
/// Turns are append-only; only the orchestrator appends, and [`Session::clear`]
/// is the single way to drop them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    turns: Vec<ConversationTurn>,

    /// Whether web search may be used when local knowledge falls short
    pub fallback_enabled: bool,

    pub response_mode: ResponseMode,
}

impl Session {
    pub fn new(fallback_enabled: bool, response_mode: ResponseMode) -> Self {
        Self {
            turns: Vec::new(),
            fallback_enabled,
            response_mode,
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Every user question so far, oldest first.
    pub fn user_questions(&self) -> Vec<&str> {
        self.turns
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
            .collect()
    }

    /// The `n`th user question (1-based), as listed by [`Session::user_questions`].
    pub fn user_question(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|idx| self.user_questions().get(idx).copied())
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(ConversationTurn {
            role,
            content: content.into(),
        });
    }
}
