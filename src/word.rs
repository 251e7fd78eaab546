use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const WORD_LENGTH: usize = 5;
pub const ALPHABET_SIZE: usize = 26;

/// A five-letter word, stored as upper-case ASCII.
///
/// Construction is the only place the length/alphabet invariant is checked;
/// every `Word` in circulation is already normalised.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word([u8; WORD_LENGTH]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a 5-letter word")]
pub struct InvalidWord(pub String);

impl Word {
    /// Parses exactly five ASCII letters in any case.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != WORD_LENGTH || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        let mut letters = [0u8; WORD_LENGTH];
        for (slot, b) in letters.iter_mut().zip(bytes) {
            *slot = b.to_ascii_uppercase();
        }
        Some(Self(letters))
    }

    #[must_use]
    pub fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }

    /// Index of each letter in `A..=Z`.
    pub fn letter_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|b| (b - b'A') as usize)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({self})")
    }
}

impl FromStr for Word {
    type Err = InvalidWord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidWord(s.to_string()))
    }
}

impl TryFrom<String> for Word {
    type Error = InvalidWord;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_case() {
        let word = Word::parse("cRaNe").unwrap();
        assert_eq!(word.to_string(), "CRANE");
        assert_eq!(word, Word::parse("CRANE").unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Word::parse("CRAN").is_none()); // Too short
        assert!(Word::parse("CRANES").is_none()); // Too long
        assert!(Word::parse("CR4NE").is_none()); // Digit
        assert!(Word::parse("CRAN ").is_none()); // Space
        assert!(Word::parse("").is_none());
        assert!(Word::parse("ÉCRAN").is_none()); // Non-ASCII
    }

    #[test]
    fn test_letter_indices() {
        let word = Word::parse("AZBYC").unwrap();
        let indices: Vec<usize> = word.letter_indices().collect();
        assert_eq!(indices, vec![0, 25, 1, 24, 2]);
    }

    #[test]
    fn test_serde_as_string() {
        let word: Word = "plant".parse().unwrap();
        let json = serde_json::to_string(&word).unwrap();
        assert_eq!(json, "\"PLANT\"");
        let back: Word = serde_json::from_str("\"plant\"").unwrap();
        assert_eq!(back, word);
        assert!(serde_json::from_str::<Word>("\"plants\"").is_err());
    }

    #[test]
    fn test_from_str_error_keeps_input() {
        let err = "ab".parse::<Word>().unwrap_err();
        assert_eq!(err, InvalidWord("ab".to_string()));
    }
}
