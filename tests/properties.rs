//! Property checks over seeded random playouts.
//!
//! Every position reached by random play is checked for move generation,
//! apply/undo and piece-tracking invariants.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use leapfrog::board::{Action, Board, Cell, Color, Coord, Direction, ALL_COLORS, STARTING_PIECES};
use leapfrog::eval::heuristic::progress;
use leapfrog::movegen::{legal_actions, random_action};
use leapfrog::position::Position;
use leapfrog::search::best_action;

const SEEDS: u64 = 6;

/// Plays random actions from the start and hands every position to `check`.
fn random_playout(seed: u64, mut check: impl FnMut(&Position)) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut position = Position::default();
    check(&position);
    while !position.is_terminal() {
        let action = random_action(position.turn(), &position, &mut rng);
        position.apply(&action).unwrap();
        check(&position);
    }
}

#[test]
fn generation_always_has_exactly_one_grow() {
    for seed in 0..SEEDS {
        random_playout(seed, |position| {
            for color in ALL_COLORS {
                let actions = legal_actions(color, position);
                assert!(!actions.is_empty());
                assert_eq!(actions.iter().filter(|a| a.is_grow()).count(), 1);
                let unique: HashSet<_> = actions.iter().collect();
                assert_eq!(unique.len(), actions.len(), "duplicate action generated");
            }
        });
    }
}

#[test]
fn generated_actions_are_legal_and_round_trip() {
    for seed in 0..SEEDS {
        random_playout(seed, |position| {
            if position.is_terminal() {
                return;
            }
            let mut scratch = position.clone();
            for action in legal_actions(position.turn(), position) {
                assert!(position.validate(&action).is_ok(), "{:?} rejected", action);
                scratch.apply(&action).unwrap();
                assert!(scratch.tracker().is_consistent(scratch.board()));
                scratch.undo().unwrap();
                assert_eq!(&scratch, position, "undo of {:?} was not exact", action);
            }
        });
    }
}

#[test]
fn tracked_pieces_stay_unique_and_bounded() {
    for seed in 0..SEEDS {
        random_playout(seed, |position| {
            assert!(position.tracker().is_consistent(position.board()));
            for color in ALL_COLORS {
                let pieces = position.pieces(color);
                let unique: HashSet<_> = pieces.iter().collect();
                assert_eq!(unique.len(), pieces.len());
                assert!(pieces.len() <= STARTING_PIECES);
            }
        });
    }
}

#[test]
fn progress_is_antisymmetric_along_playouts() {
    for seed in 0..SEEDS {
        random_playout(seed, |position| {
            let red = position.pieces(Color::Red);
            let blue = position.pieces(Color::Blue);
            assert_eq!(progress(Color::Red, red, blue), -progress(Color::Blue, blue, red));
        });
    }
}

#[test]
fn best_action_is_deterministic_mid_game() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut position = Position::default();
    for _ in 0..10 {
        let action = random_action(position.turn(), &position, &mut rng);
        position.apply(&action).unwrap();
    }
    let before = position.clone();
    let color = position.turn();
    let first = best_action(&mut position, color, 2).unwrap();
    let second = best_action(&mut position, color, 2).unwrap();
    assert_eq!(first, second);
    assert_eq!(position, before);
    assert!(position.validate(&first).is_ok());
}

#[test]
fn blue_takes_the_winning_step() {
    let at = |r, c| Coord::new(r, c).unwrap();
    let mut board = Board::empty(Color::Blue);
    for c in 2..8 {
        if c != 4 {
            board.set_cell(at(0, c), Cell::Piece(Color::Blue));
        }
    }
    board.set_cell(at(1, 4), Cell::Piece(Color::Blue));
    board.set_cell(at(0, 4), Cell::LilyPad);
    board.set_cell(at(5, 5), Cell::Piece(Color::Red));
    board.set_cell(at(6, 5), Cell::LilyPad);
    let mut position = Position::new(board);

    for depth in 1..=3 {
        let action = best_action(&mut position, Color::Blue, depth).unwrap();
        assert_eq!(action, Action::step(at(1, 4), Direction::Up));
    }
}
