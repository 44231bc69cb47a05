//! Position evaluation.
//!
//! Scores a position from a given color's perspective, considering goal-row
//! progress, pieces near either edge, mobility and jump opportunities.

pub mod heuristic;

pub use heuristic::{evaluate, evaluate_with, EvalWeights};
