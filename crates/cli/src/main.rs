//! Civic Help CLI
//!
//! Conversational assistant for Karnataka government welfare schemes, with
//! web search fallback when the local scheme data falls short.

mod commands;

use clap::{Parser, Subcommand};
use civic_core::{logging, AppConfig, AppResult};
use commands::{AskCommand, ChatCommand, SchemesCommand};
use std::path::PathBuf;

/// Civic Help - ask about government welfare schemes
#[derive(Parser, Debug)]
#[command(name = "civic")]
#[command(about = "Ask about government welfare schemes, with web fallback", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "CIVIC_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "CIVIC_CONFIG")]
    config: Option<PathBuf>,

    /// Scheme corpus file
    #[arg(long, global = true, env = "CIVIC_CORPUS")]
    corpus: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug, shows reply routes)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Generative provider (gemini, ollama)
    #[arg(short, long, global = true, env = "CIVIC_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "CIVIC_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive conversation
    Chat(ChatCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// List the schemes in the corpus
    Schemes(SchemesCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace.clone(), cli.config)?.with_overrides(
        cli.workspace,
        cli.provider,
        cli.model,
        cli.corpus,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.log_json,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("Civic Help starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {} ({})", config.provider, config.model);
    tracing::debug!(
        "Embedding: {} ({})",
        config.embedding.provider,
        config.embedding.model
    );

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Schemes(_) => "schemes",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Schemes(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
