//! One-shot question.

use civic_assistant::build_assistant;
use civic_core::{AppConfig, AppError, AppResult, ResponseMode};
use clap::Args;

/// Ask a single question and print the answer
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Vec<String>,

    /// Never fall back to web search
    #[arg(long)]
    pub no_web: bool,

    /// Response mode (concise, detailed)
    #[arg(long)]
    pub mode: Option<ResponseMode>,

    /// Output as JSON (content and route)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let question = self.question.join(" ");
        if question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        config.validate()?;
        let assistant = build_assistant(config).await?;

        let mut session = assistant.new_session();
        if self.no_web {
            session.fallback_enabled = false;
        }
        if let Some(mode) = self.mode {
            session.response_mode = mode;
        }

        let reply = assistant.respond(&mut session, question.trim()).await;

        if self.json {
            let json = serde_json::to_string_pretty(&reply)?;
            println!("{}", json);
        } else {
            if config.verbose {
                eprintln!("[route: {}]", reply.route);
            }
            println!("{}", reply.content);
        }

        Ok(())
    }
}
