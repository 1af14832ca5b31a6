use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the vocabulary, morphology, and training pipeline.
#[derive(Debug, Error)]
pub enum MorphovecError {
    #[error("training corpus not found: {0}")]
    MissingCorpus(PathBuf),

    #[error("morphology file not found: {0}")]
    MissingMorphology(PathBuf),

    #[error("vocabulary file not found: {0}")]
    MissingVocabulary(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
