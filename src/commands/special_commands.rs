//! Special commands parser for interactive chat
//!
//! Commands are prefixed with `/` and are case-insensitive. The bare words
//! `exit` and `quit` also end the session.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands handled by the chat loop instead of the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Display model, tool and conversation status
    ShowStatus,

    /// Forget the conversation so far
    Clear,

    /// List the mangrove tools available to the agent
    Tools,

    /// Exit the session
    Exit,

    /// Not a special command; send the input to the agent
    None,
}

/// Parse user input into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognized `/` commands
///
/// # Examples
///
/// ```
/// use mikoko::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/clear").unwrap(), SpecialCommand::Clear);
/// assert_eq!(
///     parse_special_command("Where is Mida Creek?").unwrap(),
///     SpecialCommand::None
/// );
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/clear" | "/reset" => Ok(SpecialCommand::Clear),
        "/tools" => Ok(SpecialCommand::Tools),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the chat session
pub fn print_help() {
    println!(
        r#"
Special Commands for Mikoko Guardian Chat
=========================================

  /help           - Show this help
  /status         - Show model, tools and conversation size
  /tools          - List the mangrove tools the agent can call
  /clear          - Forget the conversation so far
  /exit, exit     - Leave the chat

Anything else is sent to the agent. Try:
  What is Mkoko?
  Tell me about Gazi Bay
  How much carbon do 25 hectares of young mangroves store?
  Plan a 5 hectare restoration at Vanga
"#
    );
}
