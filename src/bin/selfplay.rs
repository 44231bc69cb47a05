//! Self-play game generation CLI.
//!
//! Plays engine-vs-engine games and outputs the records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --depth N       Maximum search depth per move (default: 3)
//!   --movetime MS   Search time per move in ms, 0 for depth only (default: 500)
//!   --random N      Random opening plies (default: 4)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use leapfrog::selfplay::{self, SelfPlayConfig};

fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    args.get(i)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("invalid {} value", flag))
}

fn parse_args(args: &[String]) -> Result<Option<(SelfPlayConfig, Option<String>)>, String> {
    let mut config = SelfPlayConfig::default();
    let mut output_path = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--games" => {
                i += 1;
                config.num_games = value(args, i, flag)?;
            }
            "--depth" => {
                i += 1;
                config.depth = value(args, i, flag)?;
            }
            "--movetime" => {
                i += 1;
                config.movetime_ms = value(args, i, flag)?;
            }
            "--random" => {
                i += 1;
                config.random_plies = value(args, i, flag)?;
            }
            "--threads" => {
                i += 1;
                config.threads = value(args, i, flag)?;
            }
            "--seed" => {
                i += 1;
                config.seed = value(args, i, flag)?;
            }
            "--output" => {
                i += 1;
                output_path = Some(value(args, i, flag)?);
            }
            "--quiet" => config.quiet = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(Some((config, output_path)))
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let (config, output_path) = match parse_args(&args) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if !config.quiet {
        info!(
            games = config.num_games,
            depth = config.depth,
            movetime_ms = config.movetime_ms,
            random_plies = config.random_plies,
            threads = config.threads,
            "starting self-play"
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !config.quiet {
        info!(
            games = games.len(),
            secs = elapsed.as_secs_f64(),
            "self-play complete"
        );
        eprintln!("{}", selfplay::summarize(&games));
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => selfplay::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    match written {
        Ok(()) => {
            if let (Some(path), false) = (&output_path, config.quiet) {
                info!(games = games.len(), path = %path, "wrote games");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --depth N        Maximum search depth per move (default: 3)");
    eprintln!("  --movetime MS    Search time per move in ms, 0 for depth only (default: 500)");
    eprintln!("  --random N       Random opening plies (default: 4)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}
