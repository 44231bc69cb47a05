//! Action types.
//!
//! A turn is either a move of one piece (a single step, a single jump, or a
//! chain of jumps) or a grow. The data model maps directly to the action
//! notation of the LPI protocol.

use super::coord::{Coord, Direction};

/// A single player action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move: `0-3:D` (step or jump) or `1-1:D,D,D` (jump chain).
    ///
    /// `steps` is never empty. With one step the board decides whether it is
    /// a step onto an adjacent pad or a jump; with more, every step is a jump.
    Move {
        origin: Coord,
        steps: Vec<Direction>,
    },

    /// Grow: `GROW`
    Grow,
}

impl Action {
    /// Creates a move with a single direction.
    pub fn step(origin: Coord, dir: Direction) -> Self {
        Action::Move {
            origin,
            steps: vec![dir],
        }
    }

    /// Creates a move from an explicit direction sequence.
    pub fn chain(origin: Coord, steps: &[Direction]) -> Self {
        Action::Move {
            origin,
            steps: steps.to_vec(),
        }
    }

    /// Returns the origin coordinate of a move.
    pub fn origin(&self) -> Option<Coord> {
        match self {
            Action::Move { origin, .. } => Some(*origin),
            Action::Grow => None,
        }
    }

    #[inline]
    pub fn is_grow(&self) -> bool {
        matches!(self, Action::Grow)
    }
}
