//! Legal move generation.
//!
//! Generates every legal action for a color in the current position:
//! the grow, single steps, single jumps, and every jump chain (and every
//! prefix of it) discovered by backtracking search.

pub(crate) mod jumps;

use std::collections::HashSet;

use rand::Rng;
use tracing::trace;

use crate::board::{Action, Color};
use crate::position::Position;

use jumps::{ChainSearch, Visited};

/// Generates all legal actions for `color`.
///
/// `Grow` is always first. Moves follow in piece order, then direction
/// order, then chain discovery order, so the output is deterministic.
/// Every candidate is re-checked by the board before it is returned;
/// candidates the board rejects are dropped.
pub fn legal_actions(color: Color, position: &Position) -> Vec<Action> {
    let board = position.board();
    let dirs = color.legal_directions();
    let goal = color.goal_row();

    let mut candidates = vec![Action::Grow];

    for &origin in position.pieces(color) {
        if origin.row as usize == goal {
            continue;
        }
        let mut search = ChainSearch::new(board, origin, dirs);
        for &dir in dirs {
            let Some(next) = origin.offset(dir) else {
                continue;
            };
            if board.cell(next).is_pad() {
                candidates.push(Action::step(origin, dir));
            } else if let Some(landing) = search.jump_from(origin, dir) {
                candidates.push(Action::step(origin, dir));
                let visited = Visited::default().with(origin).with(landing);
                search.explore(landing, &[dir], visited);
            }
        }
        candidates.extend(
            search
                .into_chains()
                .into_iter()
                .map(|steps| Action::Move { origin, steps }),
        );
    }

    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.retain(|action| {
        if !seen.insert(action.clone()) {
            return false;
        }
        match board.validate_as(color, action) {
            Ok(()) => true,
            Err(e) => {
                trace!(?action, error = %e, "dropping generated action");
                false
            }
        }
    });
    candidates
}

/// Picks a uniformly random legal action for `color`.
pub fn random_action(color: Color, position: &Position, rng: &mut impl Rng) -> Action {
    let mut legal = legal_actions(color, position);
    let idx = rng.gen_range(0..legal.len());
    legal.swap_remove(idx)
}
