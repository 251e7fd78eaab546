use crate::word::{WORD_LENGTH, Word};
use crate::wordbank::Dictionary;
use serde::Serialize;
use thiserror::Error;

/// Why a raw guess was rejected. Stored on the rejected turn, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("'{input}' is not a single alphabetic word")]
    Format { input: String },
    #[error("your word must be exactly 5 letters, got {found}")]
    Length { found: usize },
    #[error("'{word}' is not in the word list")]
    NotInDictionary { word: Word },
}

/// Pulls the guess token out of the raw input.
///
/// Surrounding whitespace is ignored and one enclosing `[...]` pair is
/// accepted, so both `crane` and `[crane]` yield `crane`.
#[must_use]
pub fn extract_token(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
}

#[derive(Debug, Clone, Copy)]
pub struct GuessValidator<'d> {
    dictionary: &'d Dictionary,
    require_dictionary_word: bool,
}

impl<'d> GuessValidator<'d> {
    #[must_use]
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self {
            dictionary,
            require_dictionary_word: true,
        }
    }

    #[must_use]
    pub fn require_dictionary_word(mut self, required: bool) -> Self {
        self.require_dictionary_word = required;
        self
    }

    /// Checks run in order and stop at the first failure:
    /// token shape, length, alphabet, dictionary membership.
    pub fn validate(&self, raw: &str) -> Result<Word, ValidationError> {
        let token = extract_token(raw);
        let format_error = || ValidationError::Format {
            input: raw.trim().to_string(),
        };

        // Anything but letters and digits is a shape error, in any script
        if token.is_empty() || token.chars().any(|c| !c.is_alphanumeric()) {
            return Err(format_error());
        }

        let found = token.chars().count();
        if found != WORD_LENGTH {
            return Err(ValidationError::Length { found });
        }

        let word = Word::parse(token).ok_or_else(format_error)?;

        if self.require_dictionary_word && !self.dictionary.contains(&word) {
            return Err(ValidationError::NotInDictionary { word });
        }
        Ok(word)
    }
}

/// Validates against `dictionary` with membership checking on.
pub fn validate(raw: &str, dictionary: &Dictionary) -> Result<Word, ValidationError> {
    GuessValidator::new(dictionary).validate(raw)
}
