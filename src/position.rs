//! Search position: the board plus cached piece coordinates.
//!
//! The evaluator reads piece lists on every leaf, so they are kept in a
//! `PieceTracker` and updated incrementally from the relocation each apply
//! or undo reports, instead of rescanning the board.

use crate::board::{Action, Board, BoardError, Color, Coord, Displacement, ALL_COLORS};

/// Per-color lists of occupied coordinates.
///
/// Invariant: each list holds exactly the cells occupied by that color,
/// without duplicates. Relocations update entries in place, so list order is
/// stable across apply/undo pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTracker {
    pieces: [Vec<Coord>; 2],
}

impl PieceTracker {
    /// Builds the lists from a full board scan.
    pub fn scan(board: &Board) -> Self {
        PieceTracker {
            pieces: [board.pieces(Color::Red), board.pieces(Color::Blue)],
        }
    }

    /// Returns the cached coordinates of `color`'s pieces.
    #[inline]
    pub fn of(&self, color: Color) -> &[Coord] {
        &self.pieces[color.index()]
    }

    /// Moves one entry from `from` to `to`.
    fn relocate(&mut self, color: Color, from: Coord, to: Coord) {
        if let Some(slot) = self.pieces[color.index()].iter_mut().find(|c| **c == from) {
            *slot = to;
        } else {
            debug_assert!(false, "no tracked {:?} piece at {}", color, from);
        }
    }

    /// Checks the lists against the board.
    pub fn is_consistent(&self, board: &Board) -> bool {
        ALL_COLORS.iter().all(|&color| {
            let mut cached = self.of(color).to_vec();
            cached.sort();
            let before = cached.len();
            cached.dedup();
            cached.len() == before && cached == board.pieces(color)
        })
    }
}

/// The board and its piece tracker, mutated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    tracker: PieceTracker,
}

impl Default for Position {
    fn default() -> Self {
        Position::new(Board::new())
    }
}

impl Position {
    pub fn new(board: Board) -> Self {
        let tracker = PieceTracker::scan(&board);
        Position { board, tracker }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn tracker(&self) -> &PieceTracker {
        &self.tracker
    }

    /// Cached coordinates of `color`'s pieces.
    #[inline]
    pub fn pieces(&self, color: Color) -> &[Coord] {
        self.tracker.of(color)
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    pub fn validate(&self, action: &Action) -> Result<(), BoardError> {
        self.board.validate(action)
    }

    /// Applies an action and updates the tracker.
    pub fn apply(&mut self, action: &Action) -> Result<(), BoardError> {
        if let Some(Displacement { color, from, to }) = self.board.apply(action)? {
            self.tracker.relocate(color, from, to);
        }
        Ok(())
    }

    /// Undoes the last action and updates the tracker.
    pub fn undo(&mut self) -> Result<(), BoardError> {
        if let Some(Displacement { color, from, to }) = self.board.undo()? {
            self.tracker.relocate(color, to, from);
        }
        Ok(())
    }
}
