//! Self-play game generation.
//!
//! Plays full games with the engine's search on both sides and records the
//! starting layout, every action in notation, and the outcome. The first few
//! plies can be randomised so that repeated games diverge.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::board::Color;
use crate::eval::EvalWeights;
use crate::movegen::random_action;
use crate::position::Position;
use crate::protocol::layout::encode_layout;
use crate::protocol::notation::format_action;
use crate::search::{search, SearchError, SearchLimits};

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Maximum search depth per move.
    pub depth: u32,
    /// Time budget per move search (milliseconds, 0 = depth only).
    pub movetime_ms: u64,
    /// Number of opening plies played uniformly at random.
    pub random_plies: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            depth: 3,
            movetime_ms: 500,
            random_plies: 4,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

impl SelfPlayConfig {
    fn limits(&self) -> SearchLimits {
        SearchLimits {
            depth: self.depth.max(1),
            movetime: (self.movetime_ms > 0).then(|| Duration::from_millis(self.movetime_ms)),
        }
    }

    fn rng_for(&self, game_id: usize) -> SmallRng {
        if self.seed != 0 {
            SmallRng::seed_from_u64(self.seed.wrapping_add(game_id as u64))
        } else {
            SmallRng::from_entropy()
        }
    }
}

/// A complete self-play game record, one JSON object per line on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Layout of the starting position.
    pub initial_layout: String,
    /// Every action in order, in action notation.
    pub actions: Vec<String>,
    /// `"red"` or `"blue"`, absent on a draw.
    pub winner: Option<String>,
    /// Number of actions played.
    pub turns: u32,
    /// Pieces on the goal row at the end, red then blue.
    pub home: [usize; 2],
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, SearchError> {
    let mut position = Position::default();
    let initial_layout = encode_layout(position.board());
    let limits = config.limits();
    let weights = EvalWeights::default();
    let stop = AtomicBool::new(false);
    let mut actions = Vec::new();

    // Null writer for search output (discard info lines).
    let mut null_out = std::io::sink();

    while !position.is_terminal() {
        let color = position.turn();
        let action = if position.board().turn_count() < config.random_plies {
            random_action(color, &position, rng)
        } else {
            search(&mut position, color, &limits, &weights, &stop, &mut null_out)?.action
        };
        position.apply(&action)?;
        actions.push(format_action(&action));
    }

    let board = position.board();
    Ok(GameRecord {
        game_id,
        initial_layout,
        actions,
        winner: position.winner().map(|c| c.name().to_string()),
        turns: board.turn_count(),
        home: [board.home_count(Color::Red), board.home_count(Color::Blue)],
    })
}

fn report(config: &SelfPlayConfig, n: usize, game: &GameRecord, started: Instant) {
    if config.quiet {
        return;
    }
    info!(
        game = n,
        total = config.num_games,
        winner = game.winner.as_deref().unwrap_or("draw"),
        turns = game.turns,
        secs = started.elapsed().as_secs_f64(),
        "game finished"
    );
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
/// Games that fail are logged and skipped.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game));
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs self-play generation, calling `on_game` with each completed game record.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let started = Instant::now();
        let mut rng = config.rng_for(i);
        match play_game(config, i, &mut rng) {
            Ok(game) => {
                report(config, i + 1, &game, started);
                on_game(game);
            }
            Err(e) => error!(game = i, error = %e, "game failed"),
        }
    }
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "failed to build thread pool, playing sequentially");
            return run_self_play_sequential(config, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let started = Instant::now();
                        let mut rng = config.rng_for(i);
                        match play_game(config, i, &mut rng) {
                            Ok(game) => {
                                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                                report(config, n, &game, started);
                                let _ = tx.send(game);
                            }
                            Err(e) => error!(game = i, error = %e, "game failed"),
                        }
                    });
            });
        });

        // Receive completed games on this thread and pass to callback.
        for game in rx {
            on_game(game);
        }
    });
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate results of a batch of games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub draws: usize,
    pub avg_turns: f64,
}

/// Summarises a batch of games.
pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut summary = Summary {
        games: games.len(),
        ..Summary::default()
    };
    let mut total_turns = 0u64;
    for game in games {
        total_turns += game.turns as u64;
        match game.winner.as_deref() {
            Some("red") => summary.red_wins += 1,
            Some(_) => summary.blue_wins += 1,
            None => summary.draws += 1,
        }
    }
    summary.avg_turns = total_turns as f64 / games.len().max(1) as f64;
    summary
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |n: usize| 100.0 * n as f64 / self.games.max(1) as f64;
        writeln!(f, "=== Self-Play Summary ===")?;
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "Avg turns/game: {:.1}", self.avg_turns)?;
        writeln!(f, "Red wins: {} ({:.1}%)", self.red_wins, pct(self.red_wins))?;
        writeln!(f, "Blue wins: {} ({:.1}%)", self.blue_wins, pct(self.blue_wins))?;
        write!(f, "Draws: {} ({:.1}%)", self.draws, pct(self.draws))
    }
}
