//! Built-in prompt definitions.
//!
//! Variables:
//! - `assistant.system`: `domain`, `mode`
//! - `assistant.answer`: `system`, `context`, `query`, `conversation`

use crate::types::PromptDefinition;

pub const SYSTEM_PROMPT_ID: &str = "assistant.system";
pub const ANSWER_PROMPT_ID: &str = "assistant.answer";

const SYSTEM_TEMPLATE: &str = "You are a helpful assistant focused on {{domain}}. \
If the user asks something outside this domain, you may use external sources to help. \
Respond in a {{mode}} manner.";

const ANSWER_TEMPLATE: &str = "{{system}}

You have access to the following official scheme data. \
Use this information to answer the user's question. \
If the answer is present in the data, do not say you don't know.

Relevant Info:
{{context}}

User Query: {{query}}{{#if conversation}}

Conversation:
{{conversation}}{{/if}}";

/// Look up a built-in definition by id.
pub fn builtin_prompt(id: &str) -> Option<PromptDefinition> {
    let (title, template) = match id {
        SYSTEM_PROMPT_ID => ("Assistant system instruction", SYSTEM_TEMPLATE),
        ANSWER_PROMPT_ID => ("Grounded answer prompt", ANSWER_TEMPLATE),
        _ => return None,
    };

    Some(PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "builtin".to_string(),
        template: template.to_string(),
    })
}
