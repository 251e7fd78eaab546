use crate::config::EpisodeConfig;
use crate::feedback::{Feedback, compute_feedback};
use crate::validator::{GuessValidator, ValidationError};
use crate::word::Word;
use crate::wordbank::Dictionary;
use crate::{debug_log, info_log};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EpisodeError {
    #[error("episode already finished ({status}); no more guesses accepted")]
    Terminated { status: Status },
    #[error("max_attempts must be greater than zero")]
    InvalidMaxAttempts,
}

impl Status {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Status after a scored guess. Terminal states never transition.
    pub fn advance(
        self,
        feedback: Feedback,
        attempts_used: usize,
        max_attempts: usize,
    ) -> Result<Self, EpisodeError> {
        if self.is_terminal() {
            return Err(EpisodeError::Terminated { status: self });
        }
        Ok(if feedback.is_solved() {
            Self::Won
        } else if attempts_used >= max_attempts {
            Self::Lost
        } else {
            Self::InProgress
        })
    }

    /// Status after a rejected guess. Only an exhausted error allowance ends
    /// the episode.
    pub fn after_rejection(
        self,
        invalid_turns: usize,
        error_allowance: Option<usize>,
    ) -> Result<Self, EpisodeError> {
        if self.is_terminal() {
            return Err(EpisodeError::Terminated { status: self });
        }
        Ok(match error_allowance {
            Some(allowance) if invalid_turns > allowance => Self::Lost,
            _ => Self::InProgress,
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InProgress => "in progress",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TurnOutcome {
    Scored {
        guess: Word,
        feedback: Feedback,
        /// 1-based count of scored guesses, this one included.
        attempt: usize,
    },
    Rejected {
        error: ValidationError,
    },
}

/// One submission and what came of it. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    number: usize,
    raw: String,
    #[serde(flatten)]
    outcome: TurnOutcome,
}

impl Turn {
    /// 1-based position in the episode log, rejected turns included.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn outcome(&self) -> &TurnOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Scored { .. })
    }

    #[must_use]
    pub fn guess(&self) -> Option<Word> {
        match self.outcome {
            TurnOutcome::Scored { guess, .. } => Some(guess),
            TurnOutcome::Rejected { .. } => None,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        match self.outcome {
            TurnOutcome::Scored { feedback, .. } => Some(feedback),
            TurnOutcome::Rejected { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match &self.outcome {
            TurnOutcome::Scored { .. } => None,
            TurnOutcome::Rejected { error } => Some(error),
        }
    }
}

/// Serialisable snapshot of an episode, for harness reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub secret: Word,
    pub status: Status,
    pub max_attempts: usize,
    pub attempts_used: usize,
    pub turns: Vec<Turn>,
}

/// A single game: one secret, an append-only turn log and a status.
///
/// Only scored guesses count as attempts. Rejected guesses are logged so they
/// can be scored for format compliance, but they leave the attempt budget
/// untouched.
#[derive(Debug, Clone)]
pub struct Episode<'d> {
    secret: Word,
    dictionary: &'d Dictionary,
    config: EpisodeConfig,
    turns: Vec<Turn>,
    status: Status,
    attempts_used: usize,
    invalid_turns: usize,
}

impl<'d> Episode<'d> {
    pub fn start(
        secret: Word,
        max_attempts: usize,
        dictionary: &'d Dictionary,
    ) -> Result<Self, EpisodeError> {
        let config = EpisodeConfig {
            max_attempts,
            ..EpisodeConfig::default()
        };
        Self::with_config(secret, &config, dictionary)
    }

    pub fn with_config(
        secret: Word,
        config: &EpisodeConfig,
        dictionary: &'d Dictionary,
    ) -> Result<Self, EpisodeError> {
        if config.max_attempts == 0 {
            return Err(EpisodeError::InvalidMaxAttempts);
        }
        info_log!(
            "Episode started: {} attempts, {} dictionary words",
            config.max_attempts,
            dictionary.len()
        );
        Ok(Self {
            secret,
            dictionary,
            config: config.clone(),
            turns: Vec::with_capacity(config.max_attempts),
            status: Status::InProgress,
            attempts_used: 0,
            invalid_turns: 0,
        })
    }

    /// Plays one turn and returns a copy of the recorded [`Turn`].
    ///
    /// A rejected guess is still a successful call: the turn is logged with
    /// its [`ValidationError`]. The only error is submitting after the
    /// episode has finished, and then nothing is recorded.
    pub fn submit_guess(&mut self, raw: &str) -> Result<Turn, EpisodeError> {
        if self.status.is_terminal() {
            return Err(EpisodeError::Terminated {
                status: self.status,
            });
        }

        let validator = GuessValidator::new(self.dictionary)
            .require_dictionary_word(self.config.require_dictionary_word);
        let outcome = match validator.validate(raw) {
            Ok(guess) => {
                let feedback = compute_feedback(&self.secret, &guess);
                let attempt = self.attempts_used + 1;
                self.status = self
                    .status
                    .advance(feedback, attempt, self.config.max_attempts)?;
                self.attempts_used = attempt;
                debug_log!("Attempt {attempt}: {guess} -> {feedback}");
                TurnOutcome::Scored {
                    guess,
                    feedback,
                    attempt,
                }
            }
            Err(error) => {
                let invalid_turns = self.invalid_turns + 1;
                self.status = self
                    .status
                    .after_rejection(invalid_turns, self.config.error_allowance)?;
                self.invalid_turns = invalid_turns;
                debug_log!("Rejected guess {:?}: {}", raw, error);
                TurnOutcome::Rejected { error }
            }
        };

        let turn = Turn {
            number: self.turns.len() + 1,
            raw: raw.to_string(),
            outcome,
        };
        self.turns.push(turn.clone());

        if self.status.is_terminal() {
            info_log!(
                "Episode {} after {} attempts ({} rejected)",
                self.status,
                self.attempts_used,
                self.invalid_turns
            );
        }
        Ok(turn)
    }

    #[must_use]
    pub fn secret(&self) -> &Word {
        &self.secret
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.config.max_attempts
    }

    #[must_use]
    pub fn attempts_used(&self) -> usize {
        self.attempts_used
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> usize {
        self.config.max_attempts - self.attempts_used
    }

    #[must_use]
    pub fn invalid_turns(&self) -> usize {
        self.invalid_turns
    }

    /// Feedback of the most recent scored guess.
    #[must_use]
    pub fn last_scored_feedback(&self) -> Option<Feedback> {
        self.turns.iter().rev().find_map(Turn::feedback)
    }

    #[must_use]
    pub fn transcript(&self) -> Transcript {
        Transcript {
            secret: self.secret,
            status: self.status,
            max_attempts: self.config.max_attempts,
            attempts_used: self.attempts_used,
            turns: self.turns.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Exit,
}

/// Source of guesses and sink for per-turn results. The CLI reads from stdin;
/// tests drive it from a `Cursor`.
pub trait GameInterface {
    fn display_intro(&mut self, max_attempts: usize);
    fn read_guess(&mut self) -> UserAction;
    fn display_turn(&mut self, turn: &Turn, status: Status, secret: &Word);
    fn display_exit_message(&mut self);
}

/// Feeds guesses from `interface` into `episode` until it finishes or the
/// agent quits. Returns the status at that point.
pub fn game_loop<I: GameInterface>(
    episode: &mut Episode<'_>,
    interface: &mut I,
) -> Result<Status, EpisodeError> {
    interface.display_intro(episode.max_attempts());

    while !episode.is_finished() {
        let raw = match interface.read_guess() {
            UserAction::Guess(raw) => raw,
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
        };
        let turn = episode.submit_guess(&raw)?;
        interface.display_turn(&turn, episode.status(), episode.secret());
    }

    Ok(episode.status())
}
