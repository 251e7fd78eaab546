use crate::word::{ALPHABET_SIZE, WORD_LENGTH, Word};
use serde::Serialize;
use std::fmt;

/// Aggregate letter feedback for one guess.
///
/// Only counts are reported, never positions: `greens` letters are right and
/// in place, `yellows` are right but elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Feedback {
    greens: u8,
    yellows: u8,
}

impl Feedback {
    pub const SOLVED: Self = Self {
        greens: WORD_LENGTH as u8,
        yellows: 0,
    };

    /// Returns `None` when the counts could not come from a 5-letter word.
    #[must_use]
    pub fn new(greens: u8, yellows: u8) -> Option<Self> {
        if usize::from(greens) + usize::from(yellows) > WORD_LENGTH {
            return None;
        }
        Some(Self { greens, yellows })
    }

    #[must_use]
    pub fn greens(self) -> u8 {
        self.greens
    }

    #[must_use]
    pub fn yellows(self) -> u8 {
        self.yellows
    }

    #[must_use]
    pub fn is_solved(self) -> bool {
        usize::from(self.greens) == WORD_LENGTH
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "greens: {}, yellows: {}", self.greens, self.yellows)
    }
}

/// Scores `guess` against `secret`.
///
/// Greens are taken first. Yellows are then matched against whatever secret
/// letters are left, so a letter that occurs k times in the secret never
/// earns more than k greens plus yellows.
#[must_use]
pub fn compute_feedback(secret: &Word, guess: &Word) -> Feedback {
    let secret_letters = secret.letters();
    let guess_letters = guess.letters();
    let mut consumed = [false; WORD_LENGTH];
    let mut greens = 0u8;

    // First pass: greens
    for i in 0..WORD_LENGTH {
        if guess_letters[i] == secret_letters[i] {
            consumed[i] = true;
            greens += 1;
        }
    }

    // Second pass: yellows against the unconsumed secret letters
    let mut remaining = [0u8; ALPHABET_SIZE];
    for (i, idx) in secret.letter_indices().enumerate() {
        if !consumed[i] {
            remaining[idx] += 1;
        }
    }
    let mut yellows = 0u8;
    for (i, idx) in guess.letter_indices().enumerate() {
        if consumed[i] {
            continue;
        }
        if remaining[idx] > 0 {
            remaining[idx] -= 1;
            yellows += 1;
        }
    }

    Feedback { greens, yellows }
}
