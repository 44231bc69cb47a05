//! Engine configuration.
//!
//! Loaded once at startup from an optional JSON file; individual values can
//! then be overridden at runtime with `setoption`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::eval::EvalWeights;
use crate::search::SearchLimits;

/// Default maximum search depth in plies.
pub const DEFAULT_DEPTH: u32 = 3;

/// Default per-move time budget in milliseconds.
pub const DEFAULT_MOVETIME_MS: u64 = 2000;

/// Deepest search the engine accepts.
pub const MAX_DEPTH: u32 = 32;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum search depth in plies.
    pub depth: u32,
    /// Per-move time budget; 0 searches to `depth` with no deadline.
    pub movetime_ms: u64,
    /// Evaluator feature weights.
    pub weights: EvalWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: DEFAULT_DEPTH,
            movetime_ms: DEFAULT_MOVETIME_MS,
            weights: EvalWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "depth must be in 1..={}",
                MAX_DEPTH
            )));
        }
        let w = &self.weights;
        let all = [w.progress, w.blocked, w.jump]
            .into_iter()
            .chain(w.rank_tiers)
            .chain(w.left_behind_tiers);
        for value in all {
            if !value.is_finite() {
                return Err(ConfigError::Validation(
                    "weights must be finite".into(),
                ));
            }
        }
        Ok(())
    }

    /// Search limits for one move, with optional per-`go` overrides.
    pub fn limits(&self, depth: Option<u32>, movetime_ms: Option<u64>) -> SearchLimits {
        let depth = depth.unwrap_or(self.depth).clamp(1, MAX_DEPTH);
        let movetime_ms = movetime_ms.unwrap_or(self.movetime_ms);
        SearchLimits {
            depth,
            movetime: (movetime_ms > 0).then(|| Duration::from_millis(movetime_ms)),
        }
    }
}
