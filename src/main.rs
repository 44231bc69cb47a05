//! Leapfrog -- a lily-pad race engine implementing the LPI protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`).
//!
//! Usage:
//!   leapfrog [--config FILE]

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use leapfrog::config::EngineConfig;
use leapfrog::engine::Engine;
use leapfrog::protocol::parser::{parse_command, Command};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parses `--config FILE`; anything else is rejected.
fn config_path() -> Result<Option<PathBuf>, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(None),
        [flag, path] if flag == "--config" => Ok(Some(PathBuf::from(path))),
        _ => Err("usage: leapfrog [--config FILE]".to_string()),
    }
}

/// Runs the main LPI protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn run(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(cmd) = parse_command(&line) else {
            continue;
        };

        match cmd {
            Command::Lpi => engine.handle_lpi(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => engine.set_option(&name, value.as_deref()),
            Command::NewGame => engine.new_game(),
            Command::Position { layout } => {
                if let Err(e) = engine.set_position(&layout) {
                    error!(error = %e, "position rejected");
                }
            }
            Command::SetColor { color } => engine.set_color(color),
            Command::Go(params) => engine.handle_go(&params, &mut out)?,
            Command::Play { action } => engine.handle_play(&action),
            Command::Stop => {
                // Search runs on this thread, so nothing is in flight here.
            }
            Command::Quit => break,
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let config = match config_path() {
        Ok(Some(path)) => EngineConfig::load(&path),
        Ok(None) => Ok(EngineConfig::default()),
        Err(usage) => {
            eprintln!("{}", usage);
            return ExitCode::FAILURE;
        }
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };
    info!(depth = config.depth, movetime_ms = config.movetime_ms, "engine ready");

    let mut engine = Engine::new(config);
    match run(&mut engine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "i/o error");
            ExitCode::FAILURE
        }
    }
}
