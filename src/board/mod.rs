//! Board representation and game-state types.
//!
//! Contains the core data structures for coordinates, directions, cells,
//! actions, and the mutable game state with its undo log.

pub mod action;
pub mod coord;
pub mod piece;
pub mod state;

pub use action::Action;
pub use coord::{Coord, Direction, ALL_DIRECTIONS, BOARD_N, CELL_COUNT};
pub use piece::{Cell, Color, ALL_COLORS, STARTING_PIECES};
pub use state::{Board, BoardError, Displacement, Rejection, MAX_TURNS};
