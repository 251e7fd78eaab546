use crate::config::{DatasetConfig, MAX_DATASET_SIZE};
use crate::info_log;
use crate::word::Word;
use crate::wordbank::Dictionary;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("dataset must contain at least one episode")]
    Empty,
    #[error("num_train + num_eval must not exceed {}", MAX_DATASET_SIZE)]
    TooLarge,
}

/// Secrets for training and evaluation episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeSplits {
    pub train: Vec<Word>,
    pub eval: Vec<Word>,
}

/// Draws `num_train + num_eval` secrets with replacement. The same seed and
/// dictionary always give the same splits.
pub fn generate_splits(
    dictionary: &Dictionary,
    config: &DatasetConfig,
) -> Result<EpisodeSplits, DatasetError> {
    let total = config
        .num_train
        .checked_add(config.num_eval)
        .filter(|&total| total <= MAX_DATASET_SIZE)
        .ok_or(DatasetError::TooLarge)?;
    if total == 0 {
        return Err(DatasetError::Empty);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut secrets: Vec<Word> = (0..total)
        .map(|_| dictionary.sample_secret(&mut rng))
        .collect();
    let eval = secrets.split_off(config.num_train);

    info_log!(
        "Generated {} train / {} eval secrets (seed {})",
        secrets.len(),
        eval.len(),
        config.seed
    );
    Ok(EpisodeSplits {
        train: secrets,
        eval,
    })
}
