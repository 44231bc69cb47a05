//! Heuristic position evaluation.
//!
//! Scores a position from one color's perspective as a weighted sum of
//! independent features. Each feature is a pure function of the cached piece
//! lists (the board is consulted only for the neighbourhood lookups of the
//! blocked and jump features) and is antisymmetric: swapping the colors
//! negates it.
//!
//! Every feature is linear in the number of pieces and allocates nothing.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Coord, Direction};
use crate::position::Position;

/// Tunable feature weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Multiplier on the goal-distance difference.
    pub progress: f64,
    /// Bonus for a piece on its goal row, one row short, two rows short.
    pub rank_tiers: [f64; 3],
    /// Penalty for a piece on its start row, one row ahead of it.
    pub left_behind_tiers: [f64; 2],
    /// Penalty per piece with no legal step or jump.
    pub blocked: f64,
    /// Bonus per available jump.
    pub jump: f64,
}

pub const DEFAULT_PROGRESS_WEIGHT: f64 = 1.0;
pub const DEFAULT_RANK_TIERS: [f64; 3] = [3.0, 2.0, 1.0];
pub const DEFAULT_LEFT_BEHIND_TIERS: [f64; 2] = [2.0, 1.0];
pub const DEFAULT_BLOCKED_WEIGHT: f64 = 0.5;
pub const DEFAULT_JUMP_WEIGHT: f64 = 0.25;

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            progress: DEFAULT_PROGRESS_WEIGHT,
            rank_tiers: DEFAULT_RANK_TIERS,
            left_behind_tiers: DEFAULT_LEFT_BEHIND_TIERS,
            blocked: DEFAULT_BLOCKED_WEIGHT,
            jump: DEFAULT_JUMP_WEIGHT,
        }
    }
}

/// Sum of goal-row distances of `opp`'s pieces minus those of `own`'s.
///
/// `color` owns `own`; higher is better for `color`.
pub fn progress(color: Color, own: &[Coord], opp: &[Coord]) -> f64 {
    let own_sum: usize = own.iter().map(|c| color.goal_distance(c.row as usize)).sum();
    let opp_sum: usize = opp
        .iter()
        .map(|c| color.opponent().goal_distance(c.row as usize))
        .sum();
    opp_sum as f64 - own_sum as f64
}

/// Tiered value of one side's pieces by distance to `color`'s goal row.
#[inline]
fn tier_sum(color: Color, pieces: &[Coord], tiers: &[f64], distance: fn(Color, usize) -> usize) -> f64 {
    pieces
        .iter()
        .map(|c| tiers.get(distance(color, c.row as usize)).copied().unwrap_or(0.0))
        .sum()
}

/// Bonus for own pieces on or near the goal row, mirrored penalty for the
/// opponent's pieces near theirs.
pub fn rank_bonus(color: Color, own: &[Coord], opp: &[Coord], tiers: &[f64; 3]) -> f64 {
    tier_sum(color, own, tiers, Color::goal_distance)
        - tier_sum(color.opponent(), opp, tiers, Color::goal_distance)
}

/// Penalty for own pieces still near the start row, mirrored bonus for the
/// opponent's stragglers.
pub fn left_behind(color: Color, own: &[Coord], opp: &[Coord], tiers: &[f64; 2]) -> f64 {
    tier_sum(color.opponent(), opp, tiers, Color::start_distance)
        - tier_sum(color, own, tiers, Color::start_distance)
}

/// Returns whether `piece` can make any move in `color`'s directions.
fn can_move(board: &Board, color: Color, piece: Coord) -> bool {
    color.legal_directions().iter().any(|&dir| match piece.offset(dir) {
        Some(next) if board.cell(next).is_pad() => true,
        Some(next) if board.cell(next).is_occupied() => jump_landing(board, next, dir).is_some(),
        _ => false,
    })
}

#[inline]
fn jump_landing(board: &Board, over: Coord, dir: Direction) -> Option<Coord> {
    let landing = over.offset(dir)?;
    board.cell(landing).is_pad().then_some(landing)
}

fn blocked_count(board: &Board, color: Color, pieces: &[Coord]) -> usize {
    pieces
        .iter()
        .filter(|c| c.row as usize != color.goal_row() && !can_move(board, color, **c))
        .count()
}

/// Opponent's blocked pieces minus own blocked pieces. Pieces already home
/// are never counted as blocked.
pub fn blocked_pieces(board: &Board, color: Color, own: &[Coord], opp: &[Coord]) -> f64 {
    blocked_count(board, color.opponent(), opp) as f64 - blocked_count(board, color, own) as f64
}

fn jump_count(board: &Board, color: Color, pieces: &[Coord]) -> usize {
    let mut count = 0;
    for &piece in pieces {
        if piece.row as usize == color.goal_row() {
            continue;
        }
        for &dir in color.legal_directions() {
            if let Some(over) = piece.offset(dir) {
                if board.cell(over).is_occupied() && jump_landing(board, over, dir).is_some() {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Own single-jump opportunities minus the opponent's.
pub fn jump_opportunities(board: &Board, color: Color, own: &[Coord], opp: &[Coord]) -> f64 {
    jump_count(board, color, own) as f64 - jump_count(board, color.opponent(), opp) as f64
}

/// Evaluates the position from `color`'s perspective with default weights.
pub fn evaluate(color: Color, position: &Position) -> f64 {
    evaluate_with(color, position, &EvalWeights::default())
}

/// Evaluates the position from `color`'s perspective.
///
/// Terminal positions return +inf for a win, -inf for a loss and 0 for a
/// draw; heuristic terms are never added to those.
pub fn evaluate_with(color: Color, position: &Position, weights: &EvalWeights) -> f64 {
    if position.is_terminal() {
        return match position.winner() {
            Some(w) if w == color => f64::INFINITY,
            Some(_) => f64::NEG_INFINITY,
            None => 0.0,
        };
    }

    let board = position.board();
    let own = position.pieces(color);
    let opp = position.pieces(color.opponent());

    weights.progress * progress(color, own, opp)
        + rank_bonus(color, own, opp, &weights.rank_tiers)
        + left_behind(color, own, opp, &weights.left_behind_tiers)
        + weights.blocked * blocked_pieces(board, color, own, opp)
        + weights.jump * jump_opportunities(board, color, own, opp)
}
