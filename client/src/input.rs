//! Terminal command parsing

use shared::{ConfigError, Hand, PointLimit};
use thiserror::Error;

/// Something the player typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(String),
    Limit(PointLimit),
    Start,
    Throw(Hand),
    Lobby,
    Status,
    Leave,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty command")]
    Empty,
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  join <name>     join the lobby under an alias
  limit <n>       (host) set the score needed to win
  start           (host) start the match
  rock | paper | scissors
                  lock in a hand for this round
  lobby           (host) return everyone to the lobby
  status          show the current boards
  leave | quit    leave the session and exit
  help            show this list";

/// Parses one line of input into a command
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(InputError::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "join" => match rest.as_slice() {
            [] => Err(InputError::Usage("join <name>")),
            names => Ok(Command::Join(names.join(" "))),
        },
        "limit" => match rest.as_slice() {
            [value] => Ok(Command::Limit(value.parse::<PointLimit>()?)),
            _ => Err(InputError::Usage("limit <n>")),
        },
        "start" => Ok(Command::Start),
        "lobby" => Ok(Command::Lobby),
        "status" => Ok(Command::Status),
        "leave" | "quit" | "exit" => Ok(Command::Leave),
        "help" | "?" => Ok(Command::Help),
        other => other
            .parse::<Hand>()
            .map(Command::Throw)
            .map_err(|_| InputError::Unknown(verb.to_string())),
    }
}
