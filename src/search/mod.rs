//! Search and planning.
//!
//! Alpha-beta minimax over the live position, driven either to a fixed
//! depth or by iterative deepening under a time budget.

pub mod alphabeta;
pub mod ordering;
pub mod score;

use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Action, Color};
use crate::eval::EvalWeights;
use crate::movegen::legal_actions;
use crate::position::Position;

pub use alphabeta::{AlphaBeta, SearchError};
pub use ordering::{advance, order_actions};
pub use score::Score;

/// How far and how long to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration to run.
    pub depth: u32,
    /// Wall-clock budget. `None` searches to `depth` unconditionally.
    pub movetime: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        SearchLimits { depth, movetime: None }
    }
}

/// Result of a search: the best action and associated info.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub action: Action,
    pub score: Score,
    /// Depth of the last completed iteration, 0 if none completed.
    pub depth: u32,
    pub nodes: u64,
}

/// Chooses the best action for `color` with a fixed-depth search.
///
/// Returns `Grow` when the position is already decided or no action is
/// legal. The position is left exactly as it was given.
pub fn best_action(position: &mut Position, color: Color, max_depth: u32) -> Result<Action, SearchError> {
    if position.is_terminal() {
        return Ok(Action::Grow);
    }
    let weights = EvalWeights::default();
    let best = AlphaBeta::new(position, color, max_depth, &weights).root()?;
    Ok(best.map_or(Action::Grow, |(action, _)| action))
}

/// Runs iterative deepening from depth 1 up to `limits.depth`.
///
/// Emits `info` lines to `out` after every completed iteration. An
/// iteration cut short by the deadline or `stop` is discarded and the last
/// completed one is kept; if none completed, the first action in move
/// order is returned.
pub fn search<W: Write>(
    position: &mut Position,
    color: Color,
    limits: &SearchLimits,
    weights: &EvalWeights,
    stop: &AtomicBool,
    out: &mut W,
) -> Result<SearchResult, SearchError> {
    let start = Instant::now();
    let deadline = limits.movetime.map(|t| start + t);

    let mut fallback = legal_actions(color, position);
    order_actions(&mut fallback, position.board(), color);
    let mut result = SearchResult {
        action: fallback.into_iter().next().unwrap_or(Action::Grow),
        score: Score::Heuristic(0.0),
        depth: 0,
        nodes: 0,
    };
    if position.is_terminal() || position.turn() != color {
        return Ok(result);
    }

    for depth in 1..=limits.depth.max(1) {
        let mut searcher = AlphaBeta::new(position, color, depth, weights)
            .with_deadline(deadline)
            .with_stop(stop);
        let outcome = searcher.root();
        result.nodes += searcher.nodes();

        match outcome {
            Ok(Some((action, score))) => {
                result.action = action;
                result.score = score;
                result.depth = depth;
            }
            Ok(None) => break,
            Err(SearchError::Aborted) => {
                debug!(depth, nodes = result.nodes, "iteration aborted");
                break;
            }
            Err(e) => return Err(e),
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let _ = writeln!(
            out,
            "info depth {} nodes {} score {} time {}",
            depth, result.nodes, result.score, elapsed_ms
        );
        debug!(depth, nodes = result.nodes, score = %result.score, elapsed_ms, "iteration complete");

        // Nothing deeper can beat a forced win already found.
        if result.score.is_win() {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell, Coord, Direction};
    use std::sync::atomic::Ordering;

    fn at(r: usize, c: usize) -> Coord {
        Coord::new(r, c).unwrap()
    }

    fn one_step_from_home() -> Position {
        let mut board = Board::empty(Color::Red);
        for c in 1..6 {
            board.set_cell(at(7, c), Cell::Piece(Color::Red));
        }
        board.set_cell(at(6, 6), Cell::Piece(Color::Red));
        board.set_cell(at(7, 6), Cell::LilyPad);
        board.set_cell(at(2, 2), Cell::Piece(Color::Blue));
        Position::new(board)
    }

    #[test]
    fn best_action_takes_the_winning_step() {
        let mut position = one_step_from_home();
        for depth in 1..=3 {
            let action = best_action(&mut position, Color::Red, depth).unwrap();
            assert_eq!(action, Action::step(at(6, 6), Direction::Down));
        }
    }

    #[test]
    fn best_action_is_deterministic() {
        let mut position = Position::default();
        let a = best_action(&mut position, Color::Red, 2).unwrap();
        let b = best_action(&mut position, Color::Red, 2).unwrap();
        assert_eq!(a, b);
        assert_eq!(position, Position::default());
    }

    #[test]
    fn best_action_on_finished_game_is_grow() {
        let mut position = one_step_from_home();
        position.apply(&Action::step(at(6, 6), Direction::Down)).unwrap();
        assert_eq!(best_action(&mut position, Color::Blue, 2).unwrap(), Action::Grow);
    }

    #[test]
    fn search_emits_info_lines() {
        let mut position = Position::default();
        let mut out = Vec::new();
        let result = search(
            &mut position,
            Color::Red,
            &SearchLimits::depth(2),
            &EvalWeights::default(),
            &AtomicBool::new(false),
            &mut out,
        )
        .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("info depth 1"), "got: {}", output);
        assert!(output.contains("info depth 2"), "got: {}", output);
        assert_eq!(result.depth, 2);
        assert_eq!(position, Position::default());
    }

    #[test]
    fn search_stops_at_forced_win() {
        let mut position = one_step_from_home();
        let mut out = Vec::new();
        let result = search(
            &mut position,
            Color::Red,
            &SearchLimits::depth(5),
            &EvalWeights::default(),
            &AtomicBool::new(false),
            &mut out,
        )
        .unwrap();
        assert_eq!(result.depth, 1);
        assert_eq!(result.score, Score::Win(1));
    }

    #[test]
    fn raised_stop_flag_falls_back_to_ordered_first() {
        let mut position = Position::default();
        let stop = AtomicBool::new(false);
        stop.store(true, Ordering::Relaxed);
        let result = search(
            &mut position,
            Color::Red,
            &SearchLimits::depth(6),
            &EvalWeights::default(),
            &stop,
            &mut Vec::new(),
        )
        .unwrap();
        // The stop check fires on the 64th node, long before depth 1 of the
        // opening could finish, so no iteration completes.
        assert_eq!(result.depth, 0);
        assert!(position.validate(&result.action).is_ok());
        assert_eq!(position, Position::default());
    }

    #[test]
    fn search_respects_time_budget() {
        let mut position = Position::default();
        let limits = SearchLimits {
            depth: 64,
            movetime: Some(Duration::from_millis(100)),
        };
        let start = Instant::now();
        let result = search(
            &mut position,
            Color::Red,
            &limits,
            &EvalWeights::default(),
            &AtomicBool::new(false),
            &mut Vec::new(),
        )
        .unwrap();
        assert!(start.elapsed() < Duration::from_millis(600), "took {:?}", start.elapsed());
        assert!(position.validate(&result.action).is_ok());
    }
}
