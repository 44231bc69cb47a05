//! Action notation.
//!
//! A grow is written `GROW`. A move is written as its origin `row-col`,
//! a colon, then the comma-separated direction of every step:
//! `0-3:D`, `6-3:U,R,U`. Directions are `U UR R DR D DL L UL`.

use thiserror::Error;

use crate::board::{Action, Coord, Direction};

/// Errors that can occur when parsing action notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    EmptyInput,

    #[error("missing ':' between origin and steps in '{0}'")]
    MissingSeparator(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoord(String),

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("move from {0} has no steps")]
    NoSteps(String),
}

/// Parses `row-col`, e.g. `6-3`.
pub fn parse_coord(s: &str) -> Result<Coord, NotationError> {
    let bad = || NotationError::InvalidCoord(s.to_string());
    let (row, col) = s.split_once('-').ok_or_else(bad)?;
    let row: usize = row.trim().parse().map_err(|_| bad())?;
    let col: usize = col.trim().parse().map_err(|_| bad())?;
    Coord::new(row, col).ok_or_else(bad)
}

/// Parses a single action. Case-insensitive.
pub fn parse_action(s: &str) -> Result<Action, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::EmptyInput);
    }
    if s.eq_ignore_ascii_case("grow") {
        return Ok(Action::Grow);
    }

    let (origin, steps) = s
        .split_once(':')
        .ok_or_else(|| NotationError::MissingSeparator(s.to_string()))?;
    let origin = parse_coord(origin.trim())?;

    let steps = steps
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Direction::from_abbrev(t).ok_or_else(|| NotationError::UnknownDirection(t.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    if steps.is_empty() {
        return Err(NotationError::NoSteps(origin.to_string()));
    }

    Ok(Action::Move { origin, steps })
}

/// Formats an action in canonical notation.
pub fn format_action(action: &Action) -> String {
    match action {
        Action::Grow => "GROW".to_string(),
        Action::Move { origin, steps } => {
            let dirs: Vec<&str> = steps.iter().map(|d| d.abbrev()).collect();
            format!("{}:{}", origin, dirs.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(r: usize, c: usize) -> Coord {
        Coord::new(r, c).unwrap()
    }

    #[test]
    fn parse_grow() {
        assert_eq!(parse_action("GROW"), Ok(Action::Grow));
        assert_eq!(parse_action("  grow "), Ok(Action::Grow));
    }

    #[test]
    fn parse_single_step() {
        assert_eq!(
            parse_action("0-3:D"),
            Ok(Action::step(at(0, 3), Direction::Down))
        );
        assert_eq!(
            parse_action("7-2:ul"),
            Ok(Action::step(at(7, 2), Direction::UpLeft))
        );
    }

    #[test]
    fn parse_chain_with_spaces() {
        assert_eq!(
            parse_action("6-3: U, R ,U"),
            Ok(Action::chain(at(6, 3), &[Direction::Up, Direction::Right, Direction::Up]))
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_action(""), Err(NotationError::EmptyInput));
        assert_eq!(
            parse_action("0-3"),
            Err(NotationError::MissingSeparator("0-3".to_string()))
        );
        assert_eq!(
            parse_action("8-3:D"),
            Err(NotationError::InvalidCoord("8-3".to_string()))
        );
        assert_eq!(
            parse_action("a-3:D"),
            Err(NotationError::InvalidCoord("a-3".to_string()))
        );
        assert_eq!(
            parse_action("0-3:X"),
            Err(NotationError::UnknownDirection("X".to_string()))
        );
        assert_eq!(
            parse_action("0-3:"),
            Err(NotationError::NoSteps("0-3".to_string()))
        );
    }

    #[test]
    fn format_is_canonical() {
        assert_eq!(format_action(&Action::Grow), "GROW");
        let chain = Action::chain(at(6, 3), &[Direction::Up, Direction::Right, Direction::UpLeft]);
        assert_eq!(format_action(&chain), "6-3:U,R,UL");
        assert_eq!(parse_action(&format_action(&chain)), Ok(chain));
    }
}
