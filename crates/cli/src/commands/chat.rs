//! Interactive conversation loop.

use civic_assistant::{build_assistant, Assistant, Session};
use civic_core::{AppConfig, AppResult, ResponseMode};
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands:
  /history          list your earlier questions
  /retry <n>        ask question <n> again
  /clear            start a fresh conversation
  /mode <m>         concise or detailed answers
  /web on|off       allow or forbid web search fallback
  /help             show this help
  /quit             leave";

/// Start an interactive conversation
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Start with web search fallback disabled
    #[arg(long)]
    pub no_web: bool,

    /// Initial response mode (concise, detailed)
    #[arg(long)]
    pub mode: Option<ResponseMode>,
}

/// One line of user input.
#[derive(Debug, PartialEq)]
enum ChatInput {
    Question(String),
    History,
    Retry(usize),
    Clear,
    Mode(ResponseMode),
    Web(bool),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_input(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }

    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Question(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    match (name.as_str(), arg) {
        ("history", None) => ChatInput::History,
        ("clear", None) => ChatInput::Clear,
        ("help", None) => ChatInput::Help,
        ("quit" | "exit", None) => ChatInput::Quit,
        ("retry", Some(n)) => match n.parse() {
            Ok(n) if n > 0 => ChatInput::Retry(n),
            _ => ChatInput::Invalid(format!("Not a question number: {}", n)),
        },
        ("mode", Some(m)) => match m.parse() {
            Ok(mode) => ChatInput::Mode(mode),
            Err(_) => ChatInput::Invalid(format!("Unknown mode: {} (concise, detailed)", m)),
        },
        ("web", Some("on")) => ChatInput::Web(true),
        ("web", Some("off")) => ChatInput::Web(false),
        _ => ChatInput::Invalid(format!("Unknown command: /{}. Try /help", command)),
    }
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate()?;

        eprintln!("Loading scheme data...");
        let assistant = build_assistant(config).await?;

        let mut session = assistant.new_session();
        if self.no_web {
            session.fallback_enabled = false;
        }
        if let Some(mode) = self.mode {
            session.response_mode = mode;
        }

        println!(
            "🤖 Civic Help: ask about a scheme, eligibility or benefit. /help for commands."
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_input(&line) {
                ChatInput::Empty => continue,
                ChatInput::Quit => break,
                ChatInput::Help => println!("{}", HELP),
                ChatInput::Invalid(message) => println!("{}", message),
                ChatInput::Clear => {
                    session.clear();
                    println!("Conversation cleared.");
                }
                ChatInput::History => print_history(&session),
                ChatInput::Mode(mode) => {
                    session.response_mode = mode;
                    println!("Response mode: {}", mode);
                }
                ChatInput::Web(enabled) => {
                    session.fallback_enabled = enabled;
                    println!(
                        "Web search fallback {}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                ChatInput::Retry(n) => {
                    let previous = session.user_question(n).map(str::to_string);
                    match previous {
                        Some(question) => {
                            println!("↻ {}", question);
                            ask(&assistant, &mut session, &question, config.verbose).await;
                        }
                        None => println!("No question #{}. See /history", n),
                    }
                }
                ChatInput::Question(question) => {
                    ask(&assistant, &mut session, &question, config.verbose).await;
                }
            }
        }

        tracing::info!("Chat ended after {} turns", session.len());
        Ok(())
    }
}

async fn ask(assistant: &Assistant, session: &mut Session, question: &str, verbose: bool) {
    let reply = assistant.respond(session, question).await;
    if verbose {
        eprintln!("[route: {}]", reply.route);
    }
    println!("\n{}\n", reply.content);
}

fn print_history(session: &Session) {
    let questions = session.user_questions();
    if questions.is_empty() {
        println!("No questions yet.");
        return;
    }
    for (i, question) in questions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, question);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            parse_input("  Who is eligible for Shakti?  "),
            ChatInput::Question("Who is eligible for Shakti?".to_string())
        );
        assert_eq!(parse_input("   "), ChatInput::Empty);
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("/history"), ChatInput::History);
        assert_eq!(parse_input("/CLEAR"), ChatInput::Clear);
        assert_eq!(parse_input("/exit"), ChatInput::Quit);
        assert_eq!(parse_input("/retry 2"), ChatInput::Retry(2));
        assert_eq!(parse_input("/mode detailed"), ChatInput::Mode(ResponseMode::Detailed));
        assert_eq!(parse_input("/web off"), ChatInput::Web(false));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(parse_input("/retry 0"), ChatInput::Invalid(_)));
        assert!(matches!(parse_input("/retry two"), ChatInput::Invalid(_)));
        assert!(matches!(parse_input("/mode loud"), ChatInput::Invalid(_)));
        assert!(matches!(parse_input("/web maybe"), ChatInput::Invalid(_)));
        assert!(matches!(parse_input("/retry"), ChatInput::Invalid(_)));
        assert!(matches!(parse_input("/"), ChatInput::Invalid(_)));
    }
}
