//! Engine state management.
//!
//! Holds the current position, our color, and the configuration, and runs
//! search for the `go` command. The position is the engine's own copy of
//! the game: our actions and the opponent's are both applied to it and
//! never undone.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{Action, BoardError, Color};
use crate::config::{EngineConfig, MAX_DEPTH};
use crate::position::Position;
use crate::protocol::layout::{parse_layout, LayoutError};
use crate::protocol::notation::format_action;
use crate::protocol::parser::GoParams;
use crate::search::{search, SearchError, SearchLimits, SearchResult};

/// Errors surfaced to the protocol loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no color set")]
    NoColor,

    #[error("it is {0}'s turn")]
    WrongTurn(&'static str),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("illegal action: {0}")]
    Board(#[from] BoardError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    config: EngineConfig,
    position: Position,
    color: Option<Color>,
    stop: Arc<AtomicBool>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

impl Engine {
    /// Creates an engine at the starting position with no color assigned.
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            position: Position::default(),
            color: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Flag that aborts the next or current search when raised. Cleared
    /// after every search.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Resets the position for a new game. The color is kept.
    pub fn new_game(&mut self) {
        self.position = Position::default();
    }

    /// Sets the current position from `startpos` or a layout string.
    pub fn set_position(&mut self, layout: &str) -> Result<(), EngineError> {
        let board = parse_layout(layout)?;
        self.position = Position::new(board);
        Ok(())
    }

    /// Sets the color the engine plays.
    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    /// Sets an engine option. Unknown names and bad values are ignored.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        let parsed = value.and_then(|v| v.parse::<u64>().ok());
        match (name, parsed) {
            ("Depth", Some(d)) if (1..=MAX_DEPTH as u64).contains(&d) => {
                self.config.depth = d as u32;
            }
            ("SearchTime", Some(ms)) => {
                self.config.movetime_ms = ms;
            }
            _ => {
                warn!(name, value, "ignoring option");
            }
        }
    }

    /// Chooses our action with the configured limits, applies it to the
    /// local position and returns it.
    pub fn on_turn_start(&mut self) -> Result<Action, EngineError> {
        let limits = self.config.limits(None, None);
        let result = self.play_turn(&limits, &mut io::sink())?;
        Ok(result.action)
    }

    /// Applies the opponent's action to the local position.
    pub fn on_opponent_action(&mut self, action: &Action) -> Result<(), EngineError> {
        if let Some(color) = self.color {
            if self.position.turn() == color {
                return Err(EngineError::WrongTurn(color.name()));
            }
        }
        self.position.apply(action)?;
        debug!(action = %format_action(action), "opponent played");
        Ok(())
    }

    /// Searches for our action, writing `info` lines to `out`, and applies
    /// the result.
    pub fn play_turn<W: Write>(
        &mut self,
        limits: &SearchLimits,
        out: &mut W,
    ) -> Result<SearchResult, EngineError> {
        let color = self.color.ok_or(EngineError::NoColor)?;
        let turn = self.position.turn();
        if turn != color {
            return Err(EngineError::WrongTurn(turn.name()));
        }

        let result = search(
            &mut self.position,
            color,
            limits,
            &self.config.weights,
            &self.stop,
            out,
        );
        self.stop.store(false, Ordering::Relaxed);
        let result = result?;

        self.position.apply(&result.action)?;
        info!(
            action = %format_action(&result.action),
            score = %result.score,
            depth = result.depth,
            nodes = result.nodes,
            "played"
        );
        Ok(result)
    }

    /// Handles the LPI handshake: writes id, options and `lpiok`.
    pub fn handle_lpi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name leapfrog")?;
        writeln!(out, "id author leapfrog")?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {}",
            self.config.depth, MAX_DEPTH
        )?;
        writeln!(
            out,
            "option name SearchTime type spin default {} min 0 max 60000",
            self.config.movetime_ms
        )?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "lpiok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles the `go` command: searches, plays and reports our action.
    pub fn handle_go<W: Write>(&mut self, params: &GoParams, out: &mut W) -> io::Result<()> {
        let limits = self.config.limits(params.depth, params.movetime);
        match self.play_turn(&limits, out) {
            Ok(result) => writeln!(out, "bestaction {}", format_action(&result.action))?,
            Err(e) => warn!(error = %e, "go failed"),
        }
        out.flush()
    }

    /// Handles the `play` command.
    pub fn handle_play(&mut self, action: &Action) {
        if let Err(e) = self.on_opponent_action(action) {
            warn!(action = %format_action(action), error = %e, "play rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Direction};
    use crate::protocol::layout::encode_layout;

    fn at(r: usize, c: usize) -> Coord {
        Coord::new(r, c).unwrap()
    }

    fn quick_engine(color: Color) -> Engine {
        let mut engine = Engine::new(EngineConfig {
            depth: 2,
            movetime_ms: 0,
            ..EngineConfig::default()
        });
        engine.set_color(color);
        engine
    }

    #[test]
    fn new_engine_is_at_start() {
        let engine = Engine::default();
        assert_eq!(engine.position(), &Position::default());
        assert!(engine.color().is_none());
    }

    #[test]
    fn set_position_valid_and_invalid() {
        let mut engine = Engine::default();
        let layout = "*RRRRRR*/.******./......../......../......../......../.******./*BBBBBB*/b/1";
        engine.set_position(layout).unwrap();
        assert_eq!(engine.position().turn(), Color::Blue);
        assert!(matches!(
            engine.set_position("garbage"),
            Err(EngineError::Layout(_))
        ));
        assert_eq!(encode_layout(engine.position().board()), layout);
    }

    #[test]
    fn set_option_overrides_config() {
        let mut engine = Engine::default();
        engine.set_option("Depth", Some("5"));
        engine.set_option("SearchTime", Some("750"));
        assert_eq!(engine.config().depth, 5);
        assert_eq!(engine.config().movetime_ms, 750);
        engine.set_option("Depth", Some("0"));
        engine.set_option("Depth", Some("deep"));
        engine.set_option("Threads", Some("8"));
        assert_eq!(engine.config().depth, 5);
    }

    #[test]
    fn on_turn_start_applies_our_action() {
        let mut engine = quick_engine(Color::Red);
        let action = engine.on_turn_start().unwrap();
        assert_eq!(engine.position().turn(), Color::Blue);
        assert_eq!(engine.position().board().history_len(), 1);
        assert!(Position::default().validate(&action).is_ok());
    }

    #[test]
    fn turn_order_is_enforced() {
        let mut engine = quick_engine(Color::Blue);
        assert!(matches!(engine.on_turn_start(), Err(EngineError::WrongTurn("red"))));

        engine
            .on_opponent_action(&Action::step(at(0, 3), Direction::Down))
            .unwrap();
        assert!(matches!(
            engine.on_opponent_action(&Action::Grow),
            Err(EngineError::WrongTurn("blue"))
        ));
        engine.on_turn_start().unwrap();
        assert_eq!(engine.position().turn(), Color::Red);
    }

    #[test]
    fn no_color_is_an_error() {
        let mut engine = Engine::default();
        assert!(matches!(engine.on_turn_start(), Err(EngineError::NoColor)));
    }

    #[test]
    fn illegal_opponent_action_is_rejected() {
        let mut engine = quick_engine(Color::Blue);
        let before = engine.position().clone();
        let result = engine.on_opponent_action(&Action::step(at(0, 3), Direction::Up));
        assert!(matches!(result, Err(EngineError::Board(_))));
        assert_eq!(engine.position(), &before);
    }

    #[test]
    fn handle_go_outputs_bestaction() {
        let mut engine = quick_engine(Color::Red);
        let mut output = Vec::new();
        engine.handle_go(&GoParams::default(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("info depth 1"), "got: {}", output);
        let line = output
            .lines()
            .find(|l| l.starts_with("bestaction "))
            .expect("bestaction line");
        let action = crate::protocol::parse_action(line.trim_start_matches("bestaction ")).unwrap();
        assert!(Position::default().validate(&action).is_ok());
    }

    #[test]
    fn raised_stop_flag_still_answers() {
        let mut engine = Engine::new(EngineConfig {
            depth: 8,
            movetime_ms: 0,
            ..EngineConfig::default()
        });
        engine.set_color(Color::Red);
        engine.stop_flag().store(true, Ordering::Relaxed);
        let mut output = Vec::new();
        engine.handle_go(&GoParams::default(), &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("bestaction "));
        assert!(!engine.stop_flag().load(Ordering::Relaxed));
    }

    #[test]
    fn handshake_and_isready() {
        let engine = Engine::default();
        let mut output = Vec::new();
        engine.handle_lpi(&mut output).unwrap();
        engine.handle_isready(&mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("id name leapfrog"));
        assert!(output.contains("option name Depth"));
        assert!(output.contains("lpiok"));
        assert!(output.ends_with("readyok\n"));
    }
}
