use serde::Serialize;

use crate::error::MorphovecError;

/// The predictive architecture used by the training kernel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Architecture {
    /// Continuous bag-of-words: predict the center word from its context.
    Cbow,
    /// Skip-gram: predict each context word from the center word.
    SkipGram,
}

/// Which objective(s) the trainer optimizes against. Both may be enabled
/// at once; at least one must be.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Objective {
    /// Use hierarchical softmax over each word's Huffman path.
    pub hierarchical_softmax: bool,
    /// Number of negative samples per positive example (0 disables negative sampling).
    pub negative_samples: u32,
}

impl Objective {
    fn is_enabled(&self) -> bool {
        self.hierarchical_softmax || self.negative_samples > 0
    }
}

/// Immutable run hyperparameters.
///
/// Constructed once via [`ConfigBuilder`] and shared (by value, it is
/// `Copy`-sized apart from its `Serialize` impl) across all worker threads.
#[derive(Clone, Debug, Serialize)]
pub struct Config {
    /// Word embedding dimensionality `D`.
    pub dims: u32,
    /// Maximum context window `W`; the effective window is drawn dynamically
    /// in `[0, W]` per center position.
    pub window: u32,
    /// Number of training epochs `E`.
    pub epochs: u32,
    /// Number of worker threads `T`.
    pub threads: u32,
    pub architecture: Architecture,
    pub objective: Objective,
    /// Subsampling threshold `s`. `s <= 0.0` disables subsampling.
    pub sample: f64,
    /// Initial (and maximum) learning rate `α₀`.
    pub alpha0: f32,
    /// Minimum token frequency retained by `SortVocab`.
    pub min_count: u32,
}

/// Builder for [`Config`] with the same defaults as the original CLI
/// (D=100, W=5, s=1e-3, hs=off, K=5, T=12, E=5, m=5); `alpha0` has no
/// intrinsic default here since it depends on the chosen architecture,
/// a decision left to the CLI layer.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    dims: u32,
    window: u32,
    epochs: u32,
    threads: u32,
    architecture: Architecture,
    hierarchical_softmax: bool,
    negative_samples: u32,
    sample: f64,
    alpha0: f32,
    min_count: u32,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            dims: 100,
            window: 5,
            epochs: 5,
            threads: 12,
            architecture: Architecture::Cbow,
            hierarchical_softmax: false,
            negative_samples: 5,
            sample: 1e-3,
            alpha0: 0.05,
            min_count: 5,
        }
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dims(mut self, dims: u32) -> Self {
        self.dims = dims;
        self
    }

    pub fn window(mut self, window: u32) -> Self {
        self.window = window;
        self
    }

    pub fn epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn hierarchical_softmax(mut self, enabled: bool) -> Self {
        self.hierarchical_softmax = enabled;
        self
    }

    pub fn negative_samples(mut self, k: u32) -> Self {
        self.negative_samples = k;
        self
    }

    pub fn sample(mut self, sample: f64) -> Self {
        self.sample = sample;
        self
    }

    pub fn alpha0(mut self, alpha0: f32) -> Self {
        self.alpha0 = alpha0;
        self
    }

    pub fn min_count(mut self, min_count: u32) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn build(self) -> Result<Config, MorphovecError> {
        if self.dims == 0 {
            return Err(MorphovecError::InvalidConfig(
                "dims must be greater than zero".into(),
            ));
        }
        if self.window == 0 {
            return Err(MorphovecError::InvalidConfig(
                "window must be greater than zero".into(),
            ));
        }
        if self.epochs == 0 {
            return Err(MorphovecError::InvalidConfig(
                "epochs must be greater than zero".into(),
            ));
        }
        if self.threads == 0 {
            return Err(MorphovecError::InvalidConfig(
                "threads must be greater than zero".into(),
            ));
        }

        let objective = Objective {
            hierarchical_softmax: self.hierarchical_softmax,
            negative_samples: self.negative_samples,
        };
        if !objective.is_enabled() {
            return Err(MorphovecError::InvalidConfig(
                "at least one of hierarchical softmax or negative sampling must be enabled".into(),
            ));
        }

        Ok(Config {
            dims: self.dims,
            window: self.window,
            epochs: self.epochs,
            threads: self.threads,
            architecture: self.architecture,
            objective,
            sample: self.sample,
            alpha0: self.alpha0,
            min_count: self.min_count,
        })
    }
}
