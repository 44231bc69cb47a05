use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use leapfrog::board::Color;
use leapfrog::eval::{evaluate, EvalWeights};
use leapfrog::movegen::{legal_actions, random_action};
use leapfrog::position::Position;
use leapfrog::protocol::parse_layout;
use leapfrog::search::{best_action, search, SearchLimits};

/// A crowded middle game, Red to move.
const MIDGAME: &str =
    "*..R.R.*/.*B*R**./..**B*../.*B**.*./..*R*.../..B.*.R./.*R***B./*.....B*/r/24";

fn midgame() -> Position {
    Position::new(parse_layout(MIDGAME).unwrap())
}

/// Plays `plies` random actions from the start.
fn random_position(plies: usize, seed: u64) -> Position {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut position = Position::default();
    for _ in 0..plies {
        if position.is_terminal() {
            break;
        }
        let action = random_action(position.turn(), &position, &mut rng);
        position.apply(&action).unwrap();
    }
    position
}

fn bench_evaluate(c: &mut Criterion) {
    let position = random_position(30, 1);
    c.bench_function("evaluate_midgame", |b| {
        b.iter(|| evaluate(black_box(Color::Red), black_box(&position)))
    });
}

fn bench_movegen_start(c: &mut Criterion) {
    let position = Position::default();
    c.bench_function("movegen_startpos", |b| {
        b.iter(|| legal_actions(black_box(Color::Red), black_box(&position)))
    });
}

fn bench_movegen_midgame(c: &mut Criterion) {
    let position = midgame();
    c.bench_function("movegen_midgame", |b| {
        b.iter(|| legal_actions(black_box(Color::Red), black_box(&position)))
    });
}

fn bench_apply_undo(c: &mut Criterion) {
    let mut position = random_position(30, 2);
    let actions = legal_actions(position.turn(), &position);
    c.bench_function("apply_undo_all_actions", |b| {
        b.iter(|| {
            for action in &actions {
                position.apply(black_box(action)).unwrap();
                position.undo().unwrap();
            }
        })
    });
}

fn bench_best_action(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    for depth in [2, 3] {
        let mut position = Position::default();
        group.bench_function(format!("startpos_depth_{}", depth), |b| {
            b.iter(|| best_action(&mut position, Color::Red, black_box(depth)).unwrap())
        });
    }
    group.finish();
}

fn bench_search_200ms(c: &mut Criterion) {
    let mut position = random_position(20, 3);
    let color = position.turn();
    let weights = EvalWeights::default();
    let limits = SearchLimits {
        depth: 32,
        movetime: Some(Duration::from_millis(200)),
    };
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("midgame_200ms", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            search(
                &mut position,
                black_box(color),
                &limits,
                &weights,
                &AtomicBool::new(false),
                &mut out,
            )
            .unwrap()
        })
    });
    group.finish();
}

fn bench_position_clone(c: &mut Criterion) {
    let position = random_position(30, 4);
    c.bench_function("position_clone", |b| b.iter(|| black_box(&position).clone()));
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_movegen_start,
    bench_movegen_midgame,
    bench_apply_undo,
    bench_best_action,
    bench_search_200ms,
    bench_position_clone,
);
criterion_main!(benches);
