//! Search scores.
//!
//! Terminal outcomes are kept apart from heuristic values instead of being
//! encoded as large numbers, so they are never mixed with finite bonuses and
//! ties between wins are broken by distance from the root.

use std::cmp::Ordering;
use std::fmt;

/// A value from the searching color's point of view.
///
/// Ordering: every `Loss` < every `Heuristic` < every `Win`. Among wins the
/// one reached in fewer plies is better; among losses the one reached in
/// more plies is better.
#[derive(Debug, Clone, Copy)]
pub enum Score {
    Loss(u32),
    Heuristic(f64),
    Win(u32),
}

impl Score {
    /// Lower bound of every reachable score.
    pub const MIN: Score = Score::Loss(0);
    /// Upper bound of every reachable score.
    pub const MAX: Score = Score::Win(0);

    /// Converts an evaluator value found `ply` plies below the root.
    pub fn from_eval(value: f64, ply: u32) -> Score {
        if value == f64::INFINITY {
            Score::Win(ply)
        } else if value == f64::NEG_INFINITY {
            Score::Loss(ply)
        } else {
            Score::Heuristic(value)
        }
    }

    #[inline]
    pub fn is_win(self) -> bool {
        matches!(self, Score::Win(_))
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Score::Heuristic(_))
    }

    fn tier(self) -> u8 {
        match self {
            Score::Loss(_) => 0,
            Score::Heuristic(_) => 1,
            Score::Win(_) => 2,
        }
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Score::Loss(a), Score::Loss(b)) => a.cmp(&b),
            (Score::Win(a), Score::Win(b)) => b.cmp(&a),
            (Score::Heuristic(a), Score::Heuristic(b)) => a.total_cmp(&b),
            (a, b) => a.tier().cmp(&b.tier()),
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Loss(ply) => write!(f, "loss {}", ply),
            Score::Heuristic(v) => write!(f, "value {:.2}", v),
            Score::Win(ply) => write!(f, "win {}", ply),
        }
    }
}
