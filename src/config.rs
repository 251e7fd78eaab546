//! Engine configuration.
//!
//! Every knob has a documented default, so an empty JSON object (`{}`) is a
//! complete configuration. CLI flags are layered on top by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_ATTEMPTS: usize = 8;
pub const DEFAULT_NUM_TRAIN: usize = 2000;
pub const DEFAULT_NUM_EVAL: usize = 20;
/// Upper bound on `num_train + num_eval`.
pub const MAX_DATASET_SIZE: usize = 10_000_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("max_attempts must be greater than zero")]
    ZeroMaxAttempts,
    #[error("reward weight '{name}' must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("dataset must contain at least one episode")]
    EmptyDataset,
    #[error("num_train + num_eval must not exceed {}", MAX_DATASET_SIZE)]
    DatasetTooLarge,
}

/// Rules for a single episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Scored guesses allowed before the episode is lost.
    pub max_attempts: usize,
    /// Rejected guesses tolerated before the episode is lost. `None` means
    /// rejected guesses never end the episode.
    pub error_allowance: Option<usize>,
    /// Reject well-formed guesses that are not in the dictionary.
    pub require_dictionary_word: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            error_allowance: None,
            require_dictionary_word: true,
        }
    }
}

/// Scales applied by the reward aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub exact_match: f64,
    pub partial_credit: f64,
    pub partial_per_green: f64,
    pub partial_per_yellow: f64,
    pub turn_efficiency: f64,
    pub format_compliance: f64,
    /// Zero out turn efficiency unless the episode was won.
    pub gate_turn_efficiency_on_win: bool,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            exact_match: 1.0,
            partial_credit: 1.0,
            partial_per_green: 0.2,
            partial_per_yellow: 0.1,
            turn_efficiency: 1.0,
            format_compliance: 1.0,
            gate_turn_efficiency_on_win: false,
        }
    }
}

impl RewardWeights {
    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("exact_match", self.exact_match),
            ("partial_credit", self.partial_credit),
            ("partial_per_green", self.partial_per_green),
            ("partial_per_yellow", self.partial_per_yellow),
            ("turn_efficiency", self.turn_efficiency),
            ("format_compliance", self.format_compliance),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Secret sampling for training/evaluation episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub num_train: usize,
    pub num_eval: usize,
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            num_train: DEFAULT_NUM_TRAIN,
            num_eval: DEFAULT_NUM_EVAL,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub episode: EpisodeConfig,
    pub rewards: RewardWeights,
    pub dataset: DatasetConfig,
    /// Newline-delimited word list. Falls back to the user or embedded list.
    pub wordbank_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.episode.max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        self.rewards.validate()?;
        match self.dataset.num_train.checked_add(self.dataset.num_eval) {
            Some(0) => Err(ConfigError::EmptyDataset),
            Some(total) if total <= MAX_DATASET_SIZE => Ok(()),
            _ => Err(ConfigError::DatasetTooLarge),
        }
    }
}
