//! LPI command parser.
//!
//! Parses incoming LPI protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::board::{Action, Color};

use super::notation::parse_action;

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
}

/// A parsed controller-to-engine LPI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the LPI protocol handshake.
    Lpi,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset engine state for a new game.
    NewGame,

    /// Set the board position from `startpos` or a layout string.
    Position { layout: String },

    /// Set the color the engine plays.
    SetColor { color: Color },

    /// Search for and play our action.
    Go(GoParams),

    /// Apply the opponent's action.
    Play { action: Action },

    /// Interrupt the current search immediately.
    Stop,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "lpi" => Some(Command::Lpi),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "stop" => Some(Command::Stop),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "setcolor" => parse_setcolor(&tokens),
        "go" => parse_go(&tokens),
        "play" => parse_play(trimmed),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position startpos|<layout>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        Some(layout) => Some(Command::Position {
            layout: layout.to_string(),
        }),
        None => {
            warn!("malformed position: expected 'position startpos|<layout>'");
            None
        }
    }
}

/// Parses `setcolor red|blue`.
fn parse_setcolor(tokens: &[&str]) -> Option<Command> {
    let Some(name) = tokens.get(1) else {
        warn!("malformed setcolor: expected 'setcolor red|blue'");
        return None;
    };
    match Color::from_name(name) {
        Some(color) => Some(Command::SetColor { color }),
        None => {
            warn!(color = *name, "unknown color");
            None
        }
    }
}

/// Parses `go [movetime <ms>] [depth <n>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "movetime" => {
                i += 1;
                match tokens.get(i).map(|t| t.parse::<u64>()) {
                    Some(Ok(v)) => params.movetime = Some(v),
                    _ => warn!(value = tokens.get(i).copied(), "invalid movetime value"),
                }
            }
            "depth" => {
                i += 1;
                match tokens.get(i).map(|t| t.parse::<u32>()) {
                    Some(Ok(v)) => params.depth = Some(v),
                    _ => warn!(value = tokens.get(i).copied(), "invalid depth value"),
                }
            }
            other => warn!(param = other, "unknown go parameter"),
        }
        i += 1;
    }

    Some(Command::Go(params))
}

/// Parses `play <action>`; everything after the keyword is the action.
fn parse_play(line: &str) -> Option<Command> {
    let rest = line.strip_prefix("play").unwrap_or("").trim();
    match parse_action(rest) {
        Ok(action) => Some(Command::Play { action }),
        Err(e) => {
            warn!(error = %e, "malformed play");
            None
        }
    }
}
