//! The trainer's parameter matrices: input embeddings, hierarchical
//! softmax output weights, and negative-sampling output weights.

use ndarray::Array2;

use crate::config::{Architecture, Config};
use crate::sampling::Rng;
use crate::shared::SharedMatrix;
use crate::vocab::Vocabulary;

/// Deterministic LCG seed for the initial `W_in` fill, independent of any
/// worker's training-time RNG.
const INIT_SEED: u64 = 1;

/// Holds the three dense parameter matrices a training run needs.
/// `hs` and `neg` are `None` when the corresponding objective is disabled,
/// so a negative-sampling-only run never allocates the softmax matrix and
/// vice versa.
pub struct ParameterStore {
    pub input: SharedMatrix,
    pub hs: Option<SharedMatrix>,
    pub neg: Option<SharedMatrix>,
}

impl ParameterStore {
    /// Allocates matrices sized to `vocab.len() x dims`, initializing
    /// `W_in` via the deterministic LCG (each row uniform in
    /// `[-0.5/dims, 0.5/dims)`, matching the original initializer) and
    /// zero-initializing whichever output matrices `config.objective`
    /// calls for.
    pub fn new(vocab: &Vocabulary, config: &Config) -> Self {
        let rows = vocab.len();
        let dims = config.dims as usize;

        let mut rng = Rng::new(INIT_SEED);
        let array = Array2::from_shape_fn((rows, dims), |_| {
            (rng.next_f64() as f32 - 0.5) / dims as f32
        });
        let input = SharedMatrix::from_fn(rows, dims, {
            let mut data = array.into_raw_vec().into_iter();
            move || data.next().unwrap_or(0.0)
        });

        let hs = if config.objective.hierarchical_softmax {
            Some(SharedMatrix::zeros(rows, dims))
        } else {
            None
        };
        let neg = if config.objective.negative_samples > 0 {
            Some(SharedMatrix::zeros(rows, dims))
        } else {
            None
        };

        ParameterStore { input, hs, neg }
    }

    pub fn dims(&self) -> usize {
        self.input.dims()
    }

    pub fn rows(&self) -> usize {
        self.input.rows()
    }
}

impl Clone for ParameterStore {
    fn clone(&self) -> Self {
        ParameterStore {
            input: self.input.clone(),
            hs: self.hs.clone(),
            neg: self.neg.clone(),
        }
    }
}

/// Picks the default initial learning rate for an architecture when the
/// caller has not overridden it: 0.025 for skip-gram, 0.05 for CBOW.
pub fn default_alpha(architecture: Architecture) -> f32 {
    match architecture {
        Architecture::Cbow => 0.05,
        Architecture::SkipGram => 0.025,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use std::io::Cursor;

    fn test_vocab() -> Vocabulary {
        Vocabulary::build_from_corpus(Cursor::new(b"a a a b b c".to_vec()), 1).unwrap()
    }

    #[test]
    fn allocates_only_configured_objectives() {
        let vocab = test_vocab();
        let config = ConfigBuilder::new()
            .dims(4)
            .negative_samples(5)
            .hierarchical_softmax(false)
            .build()
            .unwrap();
        let params = ParameterStore::new(&vocab, &config);
        assert!(params.neg.is_some());
        assert!(params.hs.is_none());
        assert_eq!(params.rows(), vocab.len());
        assert_eq!(params.dims(), 4);
    }

    #[test]
    fn input_rows_are_nonzero_after_init() {
        let vocab = test_vocab();
        let config = ConfigBuilder::new()
            .dims(8)
            .negative_samples(5)
            .build()
            .unwrap();
        let params = ParameterStore::new(&vocab, &config);
        let row = params.input.row(1);
        assert!(row.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn hs_and_neg_rows_start_zeroed() {
        let vocab = test_vocab();
        let config = ConfigBuilder::new()
            .dims(4)
            .negative_samples(5)
            .hierarchical_softmax(true)
            .build()
            .unwrap();
        let params = ParameterStore::new(&vocab, &config);
        assert!(params.hs.unwrap().row(0).iter().all(|&x| x == 0.0));
        assert!(params.neg.unwrap().row(0).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn default_alpha_depends_on_architecture() {
        assert_eq!(default_alpha(Architecture::Cbow), 0.05);
        assert_eq!(default_alpha(Architecture::SkipGram), 0.025);
    }
}
