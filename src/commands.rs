//! Command parsing for the plain-text client.

use thiserror::Error;

/// A parsed user command for the text client REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// List the signed-in user's recipes.
    List,
    /// Show a single recipe by id.
    View(i64),
    /// Delete a recipe by id.
    Delete(i64),
    /// Start the interactive add-recipe flow.
    Add,
    /// Show the signed-in user's profile.
    WhoAmI,
    /// Purge the session and exit.
    Logout,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("'{0}' requires a recipe id (e.g., '{0} 3')")]
    MissingRecipeId(String),
    #[error("Invalid recipe id '{0}'. Must be a positive number")]
    InvalidRecipeId(String),
    #[error("Unrecognized command '{0}'. Type 'help' to see available commands")]
    UnrecognizedCommand(String),
}

/// Parse a command string into a [`UserCommand`].
///
/// # Examples
///
/// ```
/// use rb_client::commands::{parse_command, UserCommand};
///
/// assert!(matches!(parse_command("list"), Ok(UserCommand::List)));
/// assert!(matches!(parse_command("view 3"), Ok(UserCommand::View(3))));
/// assert!(matches!(parse_command("add"), Ok(UserCommand::Add)));
/// ```
pub fn parse_command(input: &str) -> Result<UserCommand, ParseError> {
    let trimmed = input.trim();

    // Single-word commands first
    match trimmed {
        "list" | "ls" => return Ok(UserCommand::List),
        "add" | "new" => return Ok(UserCommand::Add),
        "whoami" => return Ok(UserCommand::WhoAmI),
        "logout" => return Ok(UserCommand::Logout),
        "help" | "?" => return Ok(UserCommand::Help),
        "quit" | "exit" => return Ok(UserCommand::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"view") | Some(&"show") => parse_id_command("view", &parts).map(UserCommand::View),
        Some(&"delete") | Some(&"rm") => {
            parse_id_command("delete", &parts).map(UserCommand::Delete)
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse the id argument of "view ID" / "delete ID".
fn parse_id_command(name: &str, parts: &[&str]) -> Result<i64, ParseError> {
    match parts.get(1) {
        Some(value) => value
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ParseError::InvalidRecipeId(value.to_string())),
        None => Err(ParseError::MissingRecipeId(name.to_string())),
    }
}
