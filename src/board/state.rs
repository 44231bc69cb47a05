//! Game state representation.
//!
//! Holds the full board, the side to move and the turn counter, plus an
//! explicit delta log so that every applied action can be undone exactly.
//! This is the single mutable resource the search drives in place.

use std::fmt;

use thiserror::Error;

use super::action::Action;
use super::coord::{Coord, Direction, ALL_DIRECTIONS, BOARD_N, CELL_COUNT};
use super::piece::{Cell, Color, ALL_COLORS};

/// Number of applied actions after which the game ends.
pub const MAX_TURNS: u32 = 150;

/// The rule an illegal action violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the game is already over")]
    GameOver,

    #[error("move has no directions")]
    NoSteps,

    #[error("no {0:?} piece at {1}")]
    NotOwnPiece(Color, Coord),

    #[error("piece at {0} is already on its goal row")]
    AlreadyHome(Coord),

    #[error("{1:?} is not a legal direction for {0:?}")]
    IllegalDirection(Color, Direction),

    #[error("move leaves the board from {0}")]
    OffBoard(Coord),

    #[error("no lily pad to land on at {0}")]
    NoLandingPad(Coord),

    #[error("nothing to jump over at {0}")]
    NothingToJump(Coord),
}

/// Errors raised by the board when applying or undoing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("illegal action: {0}")]
    IllegalAction(#[from] Rejection),

    #[error("no action to undo")]
    NoHistory,
}

/// A piece relocation performed by a move, reported to callers that keep
/// derived state (the piece tracker) in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displacement {
    pub color: Color,
    pub from: Coord,
    pub to: Coord,
}

/// Exact inverse of one applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Delta {
    displaced: Option<Displacement>,
    grown: Vec<Coord>,
    prev_turn: Color,
}

/// Complete board state.
///
/// Cells are a fixed-size array indexed by `Coord::index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
    turn: Color,
    turn_count: u32,
    history: Vec<Delta>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// Creates the standard starting position with Red to move.
    pub fn new() -> Self {
        let mut board = Board::empty(Color::Red);
        let last = BOARD_N - 1;
        for r in [0, last] {
            for c in [0, last] {
                board.cells[r * BOARD_N + c] = Cell::LilyPad;
            }
        }
        for r in [1, last - 1] {
            for c in 1..last {
                board.cells[r * BOARD_N + c] = Cell::LilyPad;
            }
        }
        for c in 1..last {
            board.cells[c] = Cell::Piece(Color::Red);
            board.cells[last * BOARD_N + c] = Cell::Piece(Color::Blue);
        }
        board
    }

    /// Creates a board with every cell empty.
    pub fn empty(turn: Color) -> Self {
        Board {
            cells: [Cell::Empty; CELL_COUNT],
            turn,
            turn_count: 0,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    /// Overwrites a cell. Intended for building positions, not for play.
    pub fn set_cell(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.index()] = cell;
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    /// Number of actions applied since the start of the game.
    #[inline]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn set_turn_count(&mut self, turn_count: u32) {
        self.turn_count = turn_count;
    }

    /// Number of actions that can currently be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Coordinates of every piece of `color`, in cell-index order.
    pub fn pieces(&self, color: Color) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.piece() == Some(color))
            .map(|(i, _)| Coord::from_index(i))
            .collect()
    }

    fn piece_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|c| c.piece() == Some(color)).count()
    }

    /// Number of `color` pieces standing on its goal row.
    pub fn home_count(&self, color: Color) -> usize {
        let row = color.goal_row();
        self.cells[row * BOARD_N..(row + 1) * BOARD_N]
            .iter()
            .filter(|c| c.piece() == Some(color))
            .count()
    }

    fn all_home(&self, color: Color) -> bool {
        let total = self.piece_count(color);
        total > 0 && self.home_count(color) == total
    }

    /// Returns true once a color has all pieces home or the turn limit is hit.
    pub fn is_terminal(&self) -> bool {
        self.turn_count >= MAX_TURNS || ALL_COLORS.iter().any(|&c| self.all_home(c))
    }

    /// Returns the winning color, or None while running or on a draw.
    pub fn winner(&self) -> Option<Color> {
        if let Some(&color) = ALL_COLORS.iter().find(|&&c| self.all_home(c)) {
            return Some(color);
        }
        if self.turn_count >= MAX_TURNS {
            let red = self.home_count(Color::Red);
            let blue = self.home_count(Color::Blue);
            return match red.cmp(&blue) {
                std::cmp::Ordering::Greater => Some(Color::Red),
                std::cmp::Ordering::Less => Some(Color::Blue),
                std::cmp::Ordering::Equal => None,
            };
        }
        None
    }

    /// Follows a move's direction sequence and returns the final landing cell.
    ///
    /// The moving piece is treated as lifted: its origin reads as empty, so a
    /// chain can neither jump over nor land on the cell it started from.
    fn resolve_move(&self, color: Color, origin: Coord, steps: &[Direction]) -> Result<Coord, Rejection> {
        if steps.is_empty() {
            return Err(Rejection::NoSteps);
        }
        if self.cell(origin) != Cell::Piece(color) {
            return Err(Rejection::NotOwnPiece(color, origin));
        }
        if origin.row as usize == color.goal_row() {
            return Err(Rejection::AlreadyHome(origin));
        }

        let view = |c: Coord| if c == origin { Cell::Empty } else { self.cell(c) };
        let single = steps.len() == 1;
        let mut at = origin;

        for &dir in steps {
            if !color.allows(dir) {
                return Err(Rejection::IllegalDirection(color, dir));
            }
            let next = at.offset(dir).ok_or(Rejection::OffBoard(at))?;
            let next_cell = view(next);
            if single && next_cell.is_pad() {
                return Ok(next);
            }
            if !next_cell.is_occupied() {
                return Err(if single {
                    Rejection::NoLandingPad(next)
                } else {
                    Rejection::NothingToJump(next)
                });
            }
            let landing = next.offset(dir).ok_or(Rejection::OffBoard(next))?;
            if !view(landing).is_pad() {
                return Err(Rejection::NoLandingPad(landing));
            }
            at = landing;
        }

        Ok(at)
    }

    /// Checks an action for the side to move without changing anything.
    pub fn validate(&self, action: &Action) -> Result<(), BoardError> {
        if self.is_terminal() {
            return Err(Rejection::GameOver.into());
        }
        self.validate_as(self.turn, action)
    }

    /// Checks the movement rules of an action as if `color` were to move.
    ///
    /// Unlike `validate`, this does not look at the side to move or at
    /// whether the game has ended.
    pub fn validate_as(&self, color: Color, action: &Action) -> Result<(), BoardError> {
        match action {
            Action::Grow => Ok(()),
            Action::Move { origin, steps } => {
                self.resolve_move(color, *origin, steps)?;
                Ok(())
            }
        }
    }

    /// Applies an action for the side to move and records its inverse.
    ///
    /// Returns the piece relocation for moves, None for grows.
    pub fn apply(&mut self, action: &Action) -> Result<Option<Displacement>, BoardError> {
        if self.is_terminal() {
            return Err(Rejection::GameOver.into());
        }

        let color = self.turn;
        let delta = match action {
            Action::Move { origin, steps } => {
                let to = self.resolve_move(color, *origin, steps)?;
                self.cells[origin.index()] = Cell::Empty;
                self.cells[to.index()] = Cell::Piece(color);
                Delta {
                    displaced: Some(Displacement {
                        color,
                        from: *origin,
                        to,
                    }),
                    grown: Vec::new(),
                    prev_turn: color,
                }
            }
            Action::Grow => Delta {
                displaced: None,
                grown: self.grow(color),
                prev_turn: color,
            },
        };

        let displaced = delta.displaced;
        self.history.push(delta);
        self.turn = color.opponent();
        self.turn_count += 1;
        Ok(displaced)
    }

    /// Turns every empty neighbour of `color`'s pieces into a lily pad.
    fn grow(&mut self, color: Color) -> Vec<Coord> {
        let mut grown = Vec::new();
        for piece in self.pieces(color) {
            for dir in ALL_DIRECTIONS {
                if let Some(n) = piece.offset(dir) {
                    if self.cells[n.index()] == Cell::Empty {
                        self.cells[n.index()] = Cell::LilyPad;
                        grown.push(n);
                    }
                }
            }
        }
        grown
    }

    /// Reverts the most recently applied action.
    ///
    /// Returns the relocation that was reversed, expressed in its forward
    /// (from, to) direction.
    pub fn undo(&mut self) -> Result<Option<Displacement>, BoardError> {
        let delta = self.history.pop().ok_or(BoardError::NoHistory)?;
        if let Some(d) = delta.displaced {
            self.cells[d.to.index()] = Cell::LilyPad;
            self.cells[d.from.index()] = Cell::Piece(d.color);
        }
        for c in &delta.grown {
            self.cells[c.index()] = Cell::Empty;
        }
        self.turn = delta.prev_turn;
        self.turn_count -= 1;
        Ok(delta.displaced)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_N {
            let row: String = self.cells[r * BOARD_N..(r + 1) * BOARD_N]
                .iter()
                .map(|c| c.layout_char())
                .collect();
            writeln!(f, "{}", row)?;
        }
        write!(f, "{} to move, turn {}", self.turn.name(), self.turn_count)
    }
}
