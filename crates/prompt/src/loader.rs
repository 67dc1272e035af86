//! Prompt loader.
//!
//! A YAML file `<workspace>/.civic/prompts/<id>.yml` overrides the built-in
//! definition with the same id.

use crate::builtin::builtin_prompt;
use crate::types::PromptDefinition;
use civic_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID.
///
/// # Example
/// ```no_run
/// use civic_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "assistant.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".civic/prompts")
        .join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        tracing::debug!("No override at {:?}, using built-in prompt", prompt_file);
        return builtin_prompt(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Prompt not found: {}", prompt_id)));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition, prompt_id)?;

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

fn validate_prompt(def: &PromptDefinition, expected_id: &str) -> AppResult<()> {
    if def.id != expected_id {
        return Err(AppError::Prompt(format!(
            "Prompt id '{}' does not match file name '{}'",
            def.id, expected_id
        )));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
