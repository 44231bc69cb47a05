//! Move ordering.
//!
//! Alpha-beta prunes more when strong moves are tried first. Actions are
//! sorted by how many rows they carry the moving piece towards its goal, a
//! cheap proxy that needs no apply/undo.

use std::cmp::Reverse;

use crate::board::{Action, Board, Color};

/// Rows gained towards `color`'s goal row by `action`. Grows score zero.
pub fn advance(board: &Board, action: &Action, color: Color) -> i32 {
    let Action::Move { origin, steps } = action else {
        return 0;
    };
    let jumping = steps.len() > 1
        || steps
            .first()
            .and_then(|&d| origin.offset(d))
            .is_some_and(|c| board.cell(c).is_occupied());
    let stride = if jumping { 2 } else { 1 };
    steps
        .iter()
        .map(|d| d.delta().0 * color.forward() * stride)
        .sum()
}

/// Sorts the mover's actions best-first. The sort is stable, so equal
/// actions keep generation order and the result is deterministic.
pub fn order_actions(actions: &mut [Action], board: &Board, mover: Color) {
    actions.sort_by_cached_key(|a| Reverse(advance(board, a, mover)));
}
