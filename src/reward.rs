use crate::config::RewardWeights;
use crate::feedback::Feedback;
use crate::game_state::{Episode, Status, Turn};
use serde::Serialize;

/// Reward signals for one episode, plus their weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RewardVector {
    pub exact_match: f64,
    pub partial_credit: f64,
    pub turn_efficiency: f64,
    pub format_compliance: f64,
    pub total: f64,
}

impl RewardVector {
    pub const NAMES: [&'static str; 5] = [
        "exact_match",
        "partial_credit",
        "turn_efficiency",
        "format_compliance",
        "total",
    ];

    /// `(name, value)` pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        let values = [
            self.exact_match,
            self.partial_credit,
            self.turn_efficiency,
            self.format_compliance,
            self.total,
        ];
        Self::NAMES.into_iter().zip(values)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewardAggregator {
    weights: RewardWeights,
}

impl RewardAggregator {
    #[must_use]
    pub fn new(weights: RewardWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }

    /// Scores an episode, finished or not. Pure over the episode state.
    #[must_use]
    pub fn score(&self, episode: &Episode<'_>) -> RewardVector {
        let w = &self.weights;

        let exact_match = if episode.status() == Status::Won { 1.0 } else { 0.0 };

        let partial_credit = episode
            .last_scored_feedback()
            .map_or(0.0, |feedback| self.partial_credit(feedback));

        let turn_efficiency = if w.gate_turn_efficiency_on_win && episode.status() != Status::Won {
            0.0
        } else {
            1.0 / (episode.attempts_used() as f64 + 1.0)
        };

        let total_turns = episode.turns().len();
        let format_compliance = if total_turns == 0 {
            1.0
        } else {
            let valid = episode.turns().iter().filter(|t| t.is_valid()).count();
            valid as f64 / total_turns as f64
        };

        let total = w.exact_match * exact_match
            + w.partial_credit * partial_credit
            + w.turn_efficiency * turn_efficiency
            + w.format_compliance * format_compliance;

        RewardVector {
            exact_match,
            partial_credit,
            turn_efficiency,
            format_compliance,
            total,
        }
    }

    /// `per_green * greens + per_yellow * yellows`, before the partial-credit scale.
    #[must_use]
    pub fn partial_credit(&self, feedback: Feedback) -> f64 {
        self.weights.partial_per_green * f64::from(feedback.greens())
            + self.weights.partial_per_yellow * f64::from(feedback.yellows())
    }

    /// Immediate reward for a single turn: 1.0 for the winning guess, 0.0 for
    /// the guess that loses, partial credit otherwise. Rejected turns earn 0.0.
    #[must_use]
    pub fn step_reward(&self, turn: &Turn, status_after: Status) -> f64 {
        let Some(feedback) = turn.feedback() else {
            return 0.0;
        };
        match status_after {
            Status::Won => 1.0,
            Status::Lost => 0.0,
            Status::InProgress => self.partial_credit(feedback),
        }
    }
}

/// Scores with the default weights.
#[must_use]
pub fn score(episode: &Episode<'_>) -> RewardVector {
    RewardAggregator::default().score(episode)
}
