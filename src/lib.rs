// Library interface for hurdle-wordle
// The binary is a thin wrapper around `cli::run`; harnesses use the engine
// types directly.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod reward;
pub mod validator;
pub mod word;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use config::{EngineConfig, EpisodeConfig, RewardWeights};
pub use feedback::{Feedback, compute_feedback};
pub use game_state::{Episode, EpisodeError, GameInterface, Status, Turn, TurnOutcome, game_loop};
pub use reward::{RewardAggregator, RewardVector, score};
pub use validator::{GuessValidator, ValidationError, validate};
pub use word::Word;
pub use wordbank::{Dictionary, load_wordbank_from_file, load_wordbank_from_str};
