//! Prompt builder for rendering templates.

use crate::types::PromptDefinition;
use civic_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Render a definition with its input variables into prompt text.
///
/// # Example
/// ```no_run
/// use civic_prompt::{build_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// # fn example(def: PromptDefinition) -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("query".to_string(), "Who is eligible for Sanjeevini?".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("{}", built);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<String> {
    tracing::debug!("Building prompt: {}", definition.id);

    render_template(&definition.template, &variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{builtin_prompt, ANSWER_PROMPT_ID, SYSTEM_PROMPT_ID};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{query}}", &vars(&[("query", "Hello, world!")]));
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape() {
        let result = render_template("{{context}}", &vars(&[("context", "<b>&</b>")]));
        assert_eq!(result.unwrap(), "<b>&</b>");
    }

    #[test]
    fn test_render_template_missing_variable() {
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_render_invalid_template() {
        assert!(render_template("{{#if}}", &HashMap::new()).is_err());
    }

    #[test]
    fn test_builtin_system_prompt() {
        let def = builtin_prompt(SYSTEM_PROMPT_ID).unwrap();
        let built = build_prompt(
            &def,
            vars(&[("domain", "Karnataka government schemes"), ("mode", "detailed")]),
        )
        .unwrap();

        assert!(built
            .starts_with("You are a helpful assistant focused on Karnataka government schemes."));
        assert!(built.ends_with("Respond in a detailed manner."));
    }

    #[test]
    fn test_builtin_answer_prompt_with_and_without_conversation() {
        let def = builtin_prompt(ANSWER_PROMPT_ID).unwrap();

        let without = build_prompt(
            &def,
            vars(&[("system", "SYS"), ("context", "CTX"), ("query", "Q?")]),
        )
        .unwrap();
        assert!(without.starts_with("SYS\n\n"));
        assert!(without.contains("Relevant Info:\nCTX"));
        assert!(without.ends_with("User Query: Q?"));
        assert!(!without.contains("Conversation:"));

        let with = build_prompt(
            &def,
            vars(&[
                ("system", "SYS"),
                ("context", "CTX"),
                ("query", "Q?"),
                ("conversation", "earlier question"),
            ]),
        )
        .unwrap();
        assert!(with.ends_with("Conversation:\nearlier question"));
    }
}
