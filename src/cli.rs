use crate::config::{ConfigError, EngineConfig};
use crate::dataset::{DatasetError, generate_splits};
use crate::game_state::{
    EpisodeError, Episode, GameInterface, Status, Transcript, Turn, TurnOutcome, UserAction,
    game_loop,
};
use crate::reward::{RewardAggregator, RewardVector};
use crate::word::{InvalidWord, Word};
use crate::wordbank::{Dictionary, WordbankError, load_dictionary};
use crate::{debug_log, info_log};
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;

/// Hurdle Wordle episode engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited wordbank file
    #[arg(short = 'i', long = "input", global = true)]
    pub wordbank_path: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one episode, one guess per line on stdin
    Play(EpisodeArgs),
    /// Score a fixed list of guesses and print the transcript as JSON
    Replay {
        #[command(flatten)]
        episode: EpisodeArgs,
        /// Raw guesses, in turn order
        guesses: Vec<String>,
    },
    /// Print seeded train/eval secrets as JSON
    Dataset(DatasetArgs),
}

#[derive(Args, Debug, Default)]
pub struct EpisodeArgs {
    /// Secret word; sampled from the wordbank when omitted
    #[arg(short, long)]
    pub secret: Option<String>,
    /// Seed for sampling the secret
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub max_attempts: Option<usize>,
    /// Rejected guesses tolerated before the episode is lost
    #[arg(long)]
    pub error_allowance: Option<usize>,
    /// Accept any 5-letter word, not just dictionary words
    #[arg(long)]
    pub no_dictionary_check: bool,
    /// Give zero turn efficiency to episodes that were not won
    #[arg(long)]
    pub gate_turn_efficiency: bool,
}

#[derive(Args, Debug, Default)]
pub struct DatasetArgs {
    #[arg(long)]
    pub num_train: Option<usize>,
    #[arg(long)]
    pub num_eval: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Wordbank(#[from] WordbankError),
    #[error(transparent)]
    Episode(#[from] EpisodeError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("invalid secret: {0}")]
    InvalidSecret(#[from] InvalidWord),
    #[error("secret '{0}' is not in the word list")]
    SecretNotInDictionary(Word),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl EpisodeArgs {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(max_attempts) = self.max_attempts {
            config.episode.max_attempts = max_attempts;
        }
        if self.error_allowance.is_some() {
            config.episode.error_allowance = self.error_allowance;
        }
        if self.no_dictionary_check {
            config.episode.require_dictionary_word = false;
        }
        if self.gate_turn_efficiency {
            config.rewards.gate_turn_efficiency_on_win = true;
        }
    }

    /// The explicit secret, or one drawn with `seed` (random if unset).
    /// An explicit secret must be a dictionary word only when guesses must be.
    pub fn resolve_secret(
        &self,
        dictionary: &Dictionary,
        require_dictionary_word: bool,
    ) -> Result<Word, CliError> {
        if let Some(text) = &self.secret {
            let secret: Word = text.parse()?;
            if require_dictionary_word && !dictionary.contains(&secret) {
                return Err(CliError::SecretNotInDictionary(secret));
            }
            return Ok(secret);
        }
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        debug_log!("Sampling secret with seed {}", seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(dictionary.sample_secret(&mut rng))
    }
}

impl DatasetArgs {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(num_train) = self.num_train {
            config.dataset.num_train = num_train;
        }
        if let Some(num_eval) = self.num_eval {
            config.dataset.num_eval = num_eval;
        }
        if let Some(seed) = self.seed {
            config.dataset.seed = seed;
        }
    }
}

/// Config file (or defaults), then global flags, then subcommand flags.
pub fn resolve_config(cli: &Cli) -> Result<EngineConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if cli.wordbank_path.is_some() {
        config.wordbank_path.clone_from(&cli.wordbank_path);
    }
    match &cli.command {
        Command::Play(args) | Command::Replay { episode: args, .. } => args.apply(&mut config),
        Command::Dataset(args) => args.apply(&mut config),
    }
    config.validate()?;
    Ok(config)
}

// Presentation

#[must_use]
pub fn format_intro(max_attempts: usize) -> String {
    format!(
        "Welcome to Hurdle Wordle!\n\n\
         You need to guess a secret 5-letter word.\n\
         You have {max_attempts} attempts.\n\n\
         Unlike regular Wordle, you only get counts of correct letters:\n\
         - greens: letters in the correct position\n\
         - yellows: correct letters in wrong positions\n\n\
         Submit your guess in the format: [WORD]"
    )
}

/// Message shown to the agent after a turn.
#[must_use]
pub fn format_turn_message(turn: &Turn, status: Status, secret: &Word) -> String {
    let mut message = match turn.outcome() {
        TurnOutcome::Scored {
            guess, feedback, ..
        } => format!("You submitted [{guess}].\nFeedback: {feedback}"),
        TurnOutcome::Rejected { error } => format!("Invalid guess: {error}"),
    };
    match status {
        Status::Won => message.push_str("\nCongratulations! You guessed the word correctly!"),
        Status::Lost => message.push_str(&format!("\nGame over! The word was '{secret}'.")),
        Status::InProgress => {}
    }
    message
}

/// CLI implementation of the GameInterface trait.
/// End of input and `exit` both end the session.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_intro(&mut self, max_attempts: usize) {
        println!("{}", format_intro(max_attempts));
    }

    fn read_guess(&mut self) -> UserAction {
        println!("\nEnter your guess (or 'exit' to quit):");
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => UserAction::Exit,
            Ok(_) if input.trim().eq_ignore_ascii_case("exit") => UserAction::Exit,
            Ok(_) => UserAction::Guess(input.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("Failed to read guess: {e}");
                UserAction::Exit
            }
        }
    }

    fn display_turn(&mut self, turn: &Turn, status: Status, secret: &Word) {
        println!("{}", format_turn_message(turn, status, secret));
    }

    fn display_exit_message(&mut self) {
        println!("Exiting.");
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeReport {
    pub transcript: Transcript,
    pub step_rewards: Vec<f64>,
    pub rewards: RewardVector,
}

/// Replays `guesses` in order. Guesses after the episode finishes are ignored.
pub fn replay(
    episode: &mut Episode<'_>,
    aggregator: &RewardAggregator,
    guesses: &[String],
) -> Result<EpisodeReport, CliError> {
    let mut step_rewards = Vec::with_capacity(guesses.len());
    for raw in guesses {
        if episode.is_finished() {
            info_log!("Ignoring {} guesses after episode end", guesses.len() - step_rewards.len());
            break;
        }
        let turn = episode.submit_guess(raw)?;
        step_rewards.push(aggregator.step_reward(&turn, episode.status()));
    }
    Ok(EpisodeReport {
        transcript: episode.transcript(),
        step_rewards,
        rewards: aggregator.score(episode),
    })
}

/// Runs the parsed command. `play` reads its guesses from `reader`.
pub fn run<R: BufRead>(cli: &Cli, reader: R) -> Result<(), CliError> {
    let config = resolve_config(cli)?;
    let dictionary = load_dictionary(config.wordbank_path.as_deref())?;
    info_log!("Loaded {} words", dictionary.len());

    match &cli.command {
        Command::Play(args) => {
            let secret =
                args.resolve_secret(&dictionary, config.episode.require_dictionary_word)?;
            let mut episode = Episode::with_config(secret, &config.episode, &dictionary)?;
            let mut interface = CliInterface::new(reader);
            game_loop(&mut episode, &mut interface)?;
            let rewards = RewardAggregator::new(config.rewards).score(&episode);
            println!("{}", serde_json::to_string_pretty(&rewards)?);
        }
        Command::Replay { episode: args, guesses } => {
            let secret =
                args.resolve_secret(&dictionary, config.episode.require_dictionary_word)?;
            let mut episode = Episode::with_config(secret, &config.episode, &dictionary)?;
            let aggregator = RewardAggregator::new(config.rewards);
            let report = replay(&mut episode, &aggregator, guesses)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Dataset(_) => {
            let splits = generate_splits(&dictionary, &config.dataset)?;
            println!("{}", serde_json::to_string_pretty(&splits)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordbank::{EMBEDDED_WORDBANK, load_wordbank_from_str};
    use std::io::Cursor;

    fn dict() -> Dictionary {
        load_wordbank_from_str(EMBEDDED_WORDBANK).unwrap()
    }

    fn word(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    #[test]
    fn test_parse_play_args() {
        let cli = Cli::try_parse_from([
            "hurdle-wordle",
            "-vv",
            "play",
            "--secret",
            "plant",
            "--max-attempts",
            "6",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Play(args) => {
                assert_eq!(args.secret.as_deref(), Some("plant"));
                assert_eq!(args.max_attempts, Some(6));
            }
            _ => panic!("Expected Play"),
        }
    }

    #[test]
    fn test_parse_replay_args() {
        let cli = Cli::try_parse_from([
            "hurdle-wordle",
            "replay",
            "--secret",
            "plant",
            "crane",
            "[plant]",
        ])
        .unwrap();
        match cli.command {
            Command::Replay { guesses, .. } => assert_eq!(guesses, vec!["crane", "[plant]"]),
            _ => panic!("Expected Replay"),
        }
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let cli = Cli::try_parse_from([
            "hurdle-wordle",
            "play",
            "--max-attempts",
            "4",
            "--error-allowance",
            "10",
            "--no-dictionary-check",
            "--gate-turn-efficiency",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.episode.max_attempts, 4);
        assert_eq!(config.episode.error_allowance, Some(10));
        assert!(!config.episode.require_dictionary_word);
        assert!(config.rewards.gate_turn_efficiency_on_win);
    }

    #[test]
    fn test_resolve_config_rejects_zero_attempts() {
        let cli =
            Cli::try_parse_from(["hurdle-wordle", "play", "--max-attempts", "0"]).unwrap();
        assert!(matches!(
            resolve_config(&cli),
            Err(CliError::Config(ConfigError::ZeroMaxAttempts))
        ));
    }

    #[test]
    fn test_resolve_config_rejects_oversized_dataset() {
        let cli = Cli::try_parse_from([
            "hurdle-wordle",
            "dataset",
            "--num-train",
            "18446744073709551615",
            "--num-eval",
            "1",
        ])
        .unwrap();
        assert!(matches!(
            resolve_config(&cli),
            Err(CliError::Config(ConfigError::DatasetTooLarge))
        ));
    }

    #[test]
    fn test_dataset_overrides() {
        let cli = Cli::try_parse_from([
            "hurdle-wordle",
            "dataset",
            "--num-train",
            "5",
            "--num-eval",
            "2",
            "--seed",
            "3",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.dataset.num_train, 5);
        assert_eq!(config.dataset.num_eval, 2);
        assert_eq!(config.dataset.seed, 3);
    }

    #[test]
    fn test_resolve_secret() {
        let dict = dict();
        let explicit = EpisodeArgs {
            secret: Some("plant".to_string()),
            ..EpisodeArgs::default()
        };
        assert_eq!(explicit.resolve_secret(&dict, true).unwrap(), word("PLANT"));

        let unknown = EpisodeArgs {
            secret: Some("zzzzz".to_string()),
            ..EpisodeArgs::default()
        };
        assert!(matches!(
            unknown.resolve_secret(&dict, true),
            Err(CliError::SecretNotInDictionary(_))
        ));
        assert_eq!(unknown.resolve_secret(&dict, false).unwrap(), word("ZZZZZ"));

        let malformed = EpisodeArgs {
            secret: Some("plants".to_string()),
            ..EpisodeArgs::default()
        };
        assert!(matches!(
            malformed.resolve_secret(&dict, false),
            Err(CliError::InvalidSecret(_))
        ));

        let seeded = EpisodeArgs {
            seed: Some(11),
            ..EpisodeArgs::default()
        };
        let secret = seeded.resolve_secret(&dict, true).unwrap();
        assert!(dict.contains(&secret));
        assert_eq!(secret, seeded.resolve_secret(&dict, true).unwrap());
    }

    #[test]
    fn test_turn_messages() {
        let dict = dict();
        let mut episode = Episode::start(word("PLANT"), 2, &dict).unwrap();

        let turn = episode.submit_guess("crane").unwrap();
        assert_eq!(
            format_turn_message(&turn, episode.status(), episode.secret()),
            "You submitted [CRANE].\nFeedback: greens: 2, yellows: 0"
        );

        let rejected = episode.submit_guess("plants").unwrap();
        assert_eq!(
            format_turn_message(&rejected, episode.status(), episode.secret()),
            "Invalid guess: your word must be exactly 5 letters, got 6"
        );

        let last = episode.submit_guess("apple").unwrap();
        let message = format_turn_message(&last, episode.status(), episode.secret());
        assert!(message.starts_with("You submitted [APPLE].\nFeedback: greens: 0, yellows: 3"));
        assert!(message.ends_with("Game over! The word was 'PLANT'."));
    }

    #[test]
    fn test_win_message() {
        let dict = dict();
        let mut episode = Episode::start(word("PLANT"), 8, &dict).unwrap();
        let turn = episode.submit_guess("[plant]").unwrap();
        let message = format_turn_message(&turn, episode.status(), episode.secret());
        assert!(message.contains("Feedback: greens: 5, yellows: 0"));
        assert!(message.contains("Congratulations!"));
    }

    #[test]
    fn test_intro_mentions_attempts() {
        let intro = format_intro(8);
        assert!(intro.contains("You have 8 attempts."));
        assert!(intro.contains("[WORD]"));
    }

    #[test]
    fn test_cli_interface_reads_guesses() {
        let mut interface = CliInterface::new(Cursor::new("crane\r\n[plant]\nEXIT\nslate\n"));
        assert_eq!(interface.read_guess(), UserAction::Guess("crane".to_string()));
        assert_eq!(interface.read_guess(), UserAction::Guess("[plant]".to_string()));
        assert_eq!(interface.read_guess(), UserAction::Exit);
    }

    #[test]
    fn test_cli_interface_eof_is_exit() {
        let mut interface = CliInterface::new(Cursor::new(""));
        assert_eq!(interface.read_guess(), UserAction::Exit);
    }

    #[test]
    fn test_replay_ignores_guesses_after_end() {
        let dict = dict();
        let mut episode = Episode::start(word("PLANT"), 8, &dict).unwrap();
        let guesses: Vec<String> = ["bad", "crane", "plant", "slate"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = replay(&mut episode, &RewardAggregator::default(), &guesses).unwrap();
        assert_eq!(report.transcript.turns.len(), 3);
        assert_eq!(report.step_rewards.len(), 3);
        assert_eq!(report.step_rewards[2], 1.0);
        assert_eq!(report.transcript.status, Status::Won);
        assert_eq!(report.rewards.exact_match, 1.0);
    }

    #[test]
    fn test_run_replay_and_dataset() {
        let replay_cli = Cli::try_parse_from([
            "hurdle-wordle",
            "replay",
            "--secret",
            "plant",
            "crane",
            "plant",
        ])
        .unwrap();
        run(&replay_cli, Cursor::new("")).unwrap();

        let dataset_cli = Cli::try_parse_from([
            "hurdle-wordle",
            "dataset",
            "--num-train",
            "3",
            "--num-eval",
            "1",
        ])
        .unwrap();
        run(&dataset_cli, Cursor::new("")).unwrap();
    }

    #[test]
    fn test_run_replay_with_unlisted_secret() {
        let strict =
            Cli::try_parse_from(["hurdle-wordle", "replay", "--secret", "zzzzz", "zzzzz"])
                .unwrap();
        assert!(matches!(
            run(&strict, Cursor::new("")),
            Err(CliError::SecretNotInDictionary(_))
        ));

        let relaxed = Cli::try_parse_from([
            "hurdle-wordle",
            "replay",
            "--no-dictionary-check",
            "--secret",
            "zzzzz",
            "zzzzz",
        ])
        .unwrap();
        run(&relaxed, Cursor::new("")).unwrap();
    }

    #[test]
    fn test_run_play_from_reader() {
        let cli = Cli::try_parse_from(["hurdle-wordle", "play", "--secret", "plant"]).unwrap();
        run(&cli, Cursor::new("crane\nplant\n")).unwrap();
    }
}
