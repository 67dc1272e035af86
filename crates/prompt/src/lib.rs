//! Prompt system for Civic Help.
//!
//! This crate provides structured prompt management with:
//! - Built-in prompt definitions for the assistant
//! - YAML overrides under `.civic/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use builtin::{ANSWER_PROMPT_ID, SYSTEM_PROMPT_ID};
pub use loader::load_prompt;
pub use types::PromptDefinition;
