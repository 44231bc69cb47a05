//! Leapfrog engine library.
//!
//! Exposes the board representation, move generation, evaluation, search,
//! and protocol modules for use by integration tests and the binaries.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod position;
pub mod protocol;
pub mod search;
pub mod selfplay;
