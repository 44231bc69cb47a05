//! Depth-limited minimax with alpha-beta pruning.
//!
//! The search owns the position mutably for its whole lifetime and walks the
//! tree by applying an action, recursing, and undoing it before looking at
//! the next sibling. The undo happens before the child's result is inspected,
//! so an aborted child still leaves the position exactly as it found it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use thiserror::Error;

use crate::board::{Action, BoardError, Color};
use crate::eval::{evaluate_with, EvalWeights};
use crate::movegen::legal_actions;
use crate::position::Position;

use super::ordering::order_actions;
use super::score::Score;

/// Errors that end a search early.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The deadline passed or the stop flag was raised. Recoverable: the
    /// position has been fully restored.
    #[error("search aborted")]
    Aborted,

    /// Apply/undo pairing was violated. Never expected; fatal.
    #[error("board error during search: {0}")]
    Board(#[from] BoardError),
}

/// Fixed-depth alpha-beta search from `me`'s point of view.
///
/// Depth counts plies below the root: the root's children are at depth 1,
/// and a node is scored statically once its depth exceeds `max_depth`.
pub struct AlphaBeta<'a> {
    position: &'a mut Position,
    me: Color,
    max_depth: u32,
    weights: &'a EvalWeights,
    deadline: Option<Instant>,
    stop: Option<&'a AtomicBool>,
    nodes: u64,
}

impl<'a> AlphaBeta<'a> {
    pub fn new(position: &'a mut Position, me: Color, max_depth: u32, weights: &'a EvalWeights) -> Self {
        AlphaBeta {
            position,
            me,
            max_depth,
            weights,
            deadline: None,
            stop: None,
            nodes: 0,
        }
    }

    /// Aborts the search once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Aborts the search once `stop` is set.
    pub fn with_stop(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Number of nodes entered so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Counts the node and checks the abort conditions every 64 nodes.
    #[inline]
    fn enter(&mut self) -> Result<(), SearchError> {
        self.nodes += 1;
        if self.nodes & 63 != 0 {
            return Ok(());
        }
        if self.stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
            return Err(SearchError::Aborted);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SearchError::Aborted);
        }
        Ok(())
    }

    fn leaf(&self, depth: u32) -> Score {
        Score::from_eval(evaluate_with(self.me, &*self.position, self.weights), depth)
    }

    fn ordered_actions(&self, mover: Color) -> Vec<Action> {
        let mut actions = legal_actions(mover, &*self.position);
        order_actions(&mut actions, self.position.board(), mover);
        actions
    }

    /// Searches every root action and returns the best one with its score.
    ///
    /// Ties keep the first action in move order. Returns None only when the
    /// root has no legal action.
    pub fn root(&mut self) -> Result<Option<(Action, Score)>, SearchError> {
        debug_assert_eq!(self.position.turn(), self.me, "searching for the side not to move");
        self.enter()?;
        let actions = self.ordered_actions(self.me);
        let mut best: Option<(Action, Score)> = None;

        for action in actions {
            // A child that cannot beat the best so far fails low at exactly
            // that bound, so narrowing alpha never changes which action wins.
            let alpha = best.as_ref().map_or(Score::MIN, |(_, s)| *s);
            self.position.apply(&action)?;
            let child = self.min_node(alpha, Score::MAX, 1);
            self.position.undo()?;
            let value = child?;

            if best.as_ref().map_or(true, |(_, s)| value > *s) {
                best = Some((action, value));
            }
        }

        Ok(best)
    }

    fn max_node(&mut self, mut alpha: Score, beta: Score, depth: u32) -> Result<Score, SearchError> {
        self.enter()?;
        if depth > self.max_depth || self.position.is_terminal() {
            return Ok(self.leaf(depth));
        }

        for action in self.ordered_actions(self.me) {
            self.position.apply(&action)?;
            let child = self.min_node(alpha, beta, depth + 1);
            self.position.undo()?;
            let value = child?;

            if value >= beta {
                return Ok(beta);
            }
            if value > alpha {
                alpha = value;
            }
        }
        Ok(alpha)
    }

    fn min_node(&mut self, alpha: Score, mut beta: Score, depth: u32) -> Result<Score, SearchError> {
        self.enter()?;
        if depth > self.max_depth || self.position.is_terminal() {
            return Ok(self.leaf(depth));
        }

        // Best-first for the opponent, i.e. ascending from our point of view.
        for action in self.ordered_actions(self.me.opponent()) {
            self.position.apply(&action)?;
            let child = self.max_node(alpha, beta, depth + 1);
            self.position.undo()?;
            let value = child?;

            if value <= alpha {
                return Ok(alpha);
            }
            if value < beta {
                beta = value;
            }
        }
        Ok(beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell, Coord, Direction};

    fn at(r: usize, c: usize) -> Coord {
        Coord::new(r, c).unwrap()
    }

    #[test]
    fn search_restores_position() {
        let mut position = Position::default();
        let before = position.clone();
        let weights = EvalWeights::default();
        let result = AlphaBeta::new(&mut position, Color::Red, 2, &weights).root().unwrap();
        assert!(result.is_some());
        assert_eq!(position, before);
    }

    #[test]
    fn aborted_search_restores_position() {
        let mut position = Position::default();
        let before = position.clone();
        let weights = EvalWeights::default();
        let stop = AtomicBool::new(true);
        let result = AlphaBeta::new(&mut position, Color::Red, 4, &weights)
            .with_stop(&stop)
            .root();
        assert_eq!(result, Err(SearchError::Aborted));
        assert_eq!(position, before);
    }

    #[test]
    fn expired_deadline_aborts() {
        let mut position = Position::default();
        let before = position.clone();
        let weights = EvalWeights::default();
        let result = AlphaBeta::new(&mut position, Color::Red, 4, &weights)
            .with_deadline(Some(Instant::now()))
            .root();
        assert_eq!(result, Err(SearchError::Aborted));
        assert_eq!(position, before);
    }

    #[test]
    fn finds_immediate_win() {
        let mut board = Board::empty(Color::Red);
        for c in 1..6 {
            board.set_cell(at(7, c), Cell::Piece(Color::Red));
        }
        board.set_cell(at(6, 6), Cell::Piece(Color::Red));
        board.set_cell(at(7, 6), Cell::LilyPad);
        board.set_cell(at(3, 3), Cell::Piece(Color::Blue));
        board.set_cell(at(2, 3), Cell::LilyPad);
        let mut position = Position::new(board);
        let weights = EvalWeights::default();
        let (action, score) = AlphaBeta::new(&mut position, Color::Red, 1, &weights)
            .root()
            .unwrap()
            .unwrap();
        assert_eq!(action, Action::step(at(6, 6), Direction::Down));
        assert_eq!(score, Score::Win(1));
    }

    #[test]
    fn reports_depth_of_forced_win() {
        // Red needs two more steps, so the earliest win is at ply 3 whatever
        // Blue does in between.
        let mut board = Board::empty(Color::Red);
        for c in [1, 3, 4, 6] {
            board.set_cell(at(7, c), Cell::Piece(Color::Red));
        }
        board.set_cell(at(6, 2), Cell::Piece(Color::Red));
        board.set_cell(at(7, 2), Cell::LilyPad);
        board.set_cell(at(6, 5), Cell::Piece(Color::Red));
        board.set_cell(at(7, 5), Cell::LilyPad);
        board.set_cell(at(3, 0), Cell::Piece(Color::Blue));
        let mut position = Position::new(board);
        let weights = EvalWeights::default();
        let (_, score) = AlphaBeta::new(&mut position, Color::Red, 4, &weights)
            .root()
            .unwrap()
            .unwrap();
        assert_eq!(score, Score::Win(3));
    }
}
