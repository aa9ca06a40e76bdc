//! Command registry and input parsing for the diagnostic terminal.
//!
//! Commands are declared in a static table with aliases, usage strings,
//! and argument arity; parsing handles quoted arguments and produces typo
//! suggestions for near-miss command names.

use thiserror::Error;

/// Everything the terminal can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Scan,
    Navigate,
    Read,
    List,
    Analyze,
    Status,
    Inventory,
    Save,
    Load,
    Unlock,
    History,
    Quit,
}

/// Static description of one command.
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub min_args: usize,
    pub max_args: Option<usize>,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::Help,
        name: "help",
        aliases: &["h", "?", "commands"],
        description: "Display available commands",
        usage: "help [command]",
        min_args: 0,
        max_args: Some(1),
    },
    CommandSpec {
        kind: CommandKind::Scan,
        name: "scan",
        aliases: &["s", "look", "examine"],
        description: "Scan current memory sector",
        usage: "scan",
        min_args: 0,
        max_args: Some(0),
    },
    CommandSpec {
        kind: CommandKind::Navigate,
        name: "navigate",
        aliases: &["nav", "go", "move"],
        description: "Navigate to another memory sector",
        usage: "navigate <sector>",
        min_args: 1,
        max_args: Some(1),
    },
    CommandSpec {
        kind: CommandKind::Read,
        name: "read",
        aliases: &["r", "view", "display"],
        description: "Read a memory fragment",
        usage: "read <fragment_id>",
        min_args: 1,
        max_args: Some(1),
    },
    CommandSpec {
        kind: CommandKind::List,
        name: "list",
        aliases: &["ls", "fragments"],
        description: "List available memory fragments",
        usage: "list",
        min_args: 0,
        max_args: Some(0),
    },
    CommandSpec {
        kind: CommandKind::Analyze,
        name: "analyze",
        aliases: &["a", "inspect"],
        description: "Analyze evidence and connections",
        usage: "analyze",
        min_args: 0,
        max_args: Some(0),
    },
    CommandSpec {
        kind: CommandKind::Status,
        name: "status",
        aliases: &["stat", "info"],
        description: "Display system status",
        usage: "status",
        min_args: 0,
        max_args: Some(0),
    },
    CommandSpec {
        kind: CommandKind::Inventory,
        name: "inventory",
        aliases: &["inv", "clues"],
        description: "Show discovered clues",
        usage: "inventory",
        min_args: 0,
        max_args: Some(0),
    },
    CommandSpec {
        kind: CommandKind::Save,
        name: "save",
        aliases: &[],
        description: "Save game progress",
        usage: "save [filename]",
        min_args: 0,
        max_args: Some(1),
    },
    CommandSpec {
        kind: CommandKind::Load,
        name: "load",
        aliases: &[],
        description: "Load saved game",
        usage: "load [filename]",
        min_args: 0,
        max_args: Some(1),
    },
    CommandSpec {
        kind: CommandKind::Unlock,
        name: "unlock",
        aliases: &["u", "open"],
        description: "Attempt to unlock a sector",
        usage: "unlock <sector> <key>",
        min_args: 2,
        max_args: Some(2),
    },
    CommandSpec {
        kind: CommandKind::History,
        name: "history",
        aliases: &["hist"],
        description: "Show command history",
        usage: "history",
        min_args: 0,
        max_args: Some(0),
    },
    CommandSpec {
        kind: CommandKind::Quit,
        name: "quit",
        aliases: &["exit", "q"],
        description: "Exit the game",
        usage: "quit",
        min_args: 0,
        max_args: Some(0),
    },
];

/// A successfully parsed input line.
#[derive(Debug)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

/// Errors from parsing an input line.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command: '{0}'")]
    Unknown(String),

    #[error("Not enough arguments. Usage: {0}")]
    TooFewArgs(&'static str),

    #[error("Too many arguments. Usage: {0}")]
    TooManyArgs(&'static str),
}

/// Look up a command by name or alias.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|c| c.name == name || c.aliases.contains(&name))
}

/// Parse a non-empty input line into a command and its arguments.
pub fn parse(input: &str) -> Result<ParsedCommand, ParseError> {
    let trimmed = input.trim();
    let (cmd_name, args_text) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest),
        None => (trimmed, ""),
    };
    let cmd_name = cmd_name.to_lowercase();

    let spec = find(&cmd_name).ok_or(ParseError::Unknown(cmd_name.clone()))?;

    let args = parse_arguments(args_text);
    if args.len() < spec.min_args {
        return Err(ParseError::TooFewArgs(spec.usage));
    }
    if let Some(max) = spec.max_args {
        if args.len() > max {
            return Err(ParseError::TooManyArgs(spec.usage));
        }
    }

    Ok(ParsedCommand {
        kind: spec.kind,
        args,
    })
}

/// Split arguments on whitespace, keeping double-quoted spans intact.
fn parse_arguments(args_text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in args_text.chars() {
        match ch {
            '"' => {
                if in_quotes && !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Find a similar command name for typo correction. A candidate counts as
/// similar when its length is within two of the input and at least 60% of
/// the input's characters match position-wise.
pub fn suggest(input: &str) -> Option<&'static str> {
    for spec in COMMANDS {
        let name = spec.name;
        if name.len() > 2 && name.len().abs_diff(input.len()) <= 2 {
            let matches = input
                .chars()
                .zip(name.chars())
                .filter(|(a, b)| a == b)
                .count();
            if matches * 10 >= input.chars().count() * 6 {
                return Some(name);
            }
        }
    }
    None
}
