//! Morphology-aware word embedding training.
//!
//! This crate implements the algorithmic core of a word2vec-style trainer:
//! a streaming vocabulary builder, a Huffman coder for hierarchical softmax,
//! a morpheme (prefix/root/suffix) table loader, the CBOW and skip-gram
//! training kernels under hierarchical softmax and negative sampling, and
//! the text/binary vector writers. Argument parsing, progress display, and
//! process orchestration live in the `morphovec-utils` binary crate.

mod config;
mod error;
mod hashing;
mod huffman;
mod kmeans;
mod loss;
mod morphology;
mod params;
mod sampling;
mod shared;
mod sigmoid;
mod token;
mod train;
mod vecops;
mod vocab;
mod writer;

pub use config::{Architecture, Config, ConfigBuilder, Objective};
pub use error::MorphovecError;
pub use kmeans::{spherical_kmeans, ClusterAssignment};
pub use morphology::{MorphologyRecord, MorphologyTable};
pub use params::{default_alpha, ParameterStore};
pub use sampling::UnigramTable;
pub use shared::SharedMatrix;
pub use sigmoid::SigmoidTable;
pub use token::{TokenReader, SENTENCE_BOUNDARY};
pub use train::{train, TrainingSummary};
pub use vocab::{build_from_corpus_file, load_saved_vocab, MorphemeRef, VocabEntry, Vocabulary};
pub use writer::{write_clusters, write_vectors};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, MorphovecError>;
