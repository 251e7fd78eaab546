use crate::word::Word;
use crate::{debug_log, info_log};
use rand::Rng;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

const APP_DIR: &str = "hurdle-wordle";
const WORDBANK_FILE: &str = "wordbank.txt";

#[derive(Debug, Error)]
pub enum WordbankError {
    #[error("failed to read word bank: {0}")]
    Io(#[from] io::Error),
    #[error("word bank contains no valid 5-letter words")]
    Empty,
}

/// Read-only set of valid guesses and secrets.
///
/// Shared by reference between episodes; nothing mutates it after load.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<Word>,
    index: HashSet<Word>,
}

impl Dictionary {
    /// Builds a dictionary, dropping duplicates but keeping first-seen order.
    pub fn new<I: IntoIterator<Item = Word>>(words: I) -> Result<Self, WordbankError> {
        let mut index = HashSet::new();
        let words: Vec<Word> = words.into_iter().filter(|w| index.insert(*w)).collect();
        if words.is_empty() {
            return Err(WordbankError::Empty);
        }
        Ok(Self { words, index })
    }

    #[must_use]
    pub fn contains(&self, word: &Word) -> bool {
        self.index.contains(word)
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Picks a secret uniformly at random.
    pub fn sample_secret<R: Rng + ?Sized>(&self, rng: &mut R) -> Word {
        self.words[rng.gen_range(0..self.words.len())]
    }
}

/// Parses a newline-delimited list. Lines that are not 5 letters are skipped.
pub fn load_wordbank_from_str(data: &str) -> Result<Dictionary, WordbankError> {
    let mut skipped = 0usize;
    let words: Vec<Word> = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let word = Word::parse(line);
            if word.is_none() {
                skipped += 1;
            }
            word
        })
        .collect();
    debug_log!("Parsed {} words, skipped {} lines", words.len(), skipped);
    Dictionary::new(words)
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Dictionary, WordbankError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = Word::parse(line?.trim()) {
            words.push(word);
        }
    }
    info_log!("Loaded {} words from {}", words.len(), path.as_ref().display());
    Dictionary::new(words)
}

/// Per-user override location, e.g. `~/.config/hurdle-wordle/wordbank.txt`.
#[must_use]
pub fn get_user_wordbank_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(WORDBANK_FILE))
}

/// Resolves the dictionary: explicit path, then the per-user file if it
/// exists, then the embedded list.
pub fn load_dictionary(explicit: Option<&Path>) -> Result<Dictionary, WordbankError> {
    if let Some(path) = explicit {
        return load_wordbank_from_file(path);
    }
    if let Some(path) = get_user_wordbank_path()
        && path.is_file()
    {
        return load_wordbank_from_file(path);
    }
    load_wordbank_from_str(EMBEDDED_WORDBANK)
}
