//! Subsampling, dynamic window, and negative-sampling draws.

use crate::vocab::Vocabulary;

/// Number of entries in the unigram sampling table.
const TABLE_SIZE: usize = 100_000_000;
/// Exponent applied to raw counts before building the cumulative mass
/// used to populate [`UnigramTable`].
const POWER: f64 = 0.75;

/// Per-worker 64-bit linear congruential generator, `x <- x*25214903917 + 11`.
/// Each worker owns one, seeded with its worker id, so runs are
/// reproducible given a fixed thread count.
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng { state: seed }
    }

    /// Advances the generator and returns the raw 64-bit state.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(25_214_903_917).wrapping_add(11);
        self.state
    }

    /// A uniform `f64` in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() % 100_000_000) as f64 / 100_000_000.0
    }

    /// A uniform `u32` in `[0, bound)`. `bound` must be nonzero.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        (self.next_u64() % u64::from(bound)) as u32
    }
}

/// Whether to keep a token with corpus count `c` under subsampling
/// threshold `sample`. `train_words` is `N`; `sample <= 0` disables
/// subsampling (always keep).
pub fn keep_probability(count: u64, sample: f64, train_words: u64) -> f64 {
    if sample <= 0.0 {
        return 1.0;
    }
    let c = count as f64;
    let n = train_words as f64;
    ((c / (sample * n)).sqrt() + 1.0) * (sample * n) / c
}

/// Draws whether to keep a token of count `count` given a fresh uniform
/// draw from `rng`.
pub fn subsample_keep(count: u64, sample: f64, train_words: u64, rng: &mut Rng) -> bool {
    if sample <= 0.0 {
        return true;
    }
    let keep_prob = keep_probability(count, sample, train_words);
    rng.next_f64() <= keep_prob
}

/// Draws the dynamic context shrink `b` in `{0, ..., window-1}`: the
/// effective half-window becomes `window - b`.
pub fn dynamic_shrink(window: u32, rng: &mut Rng) -> u32 {
    if window == 0 {
        0
    } else {
        rng.next_below(window)
    }
}

/// Cumulative-mass unigram table for negative sampling: exactly `10^8`
/// entries, built so that the empirical mass of index `i` converges to
/// `cn_i^0.75 / sum_j cn_j^0.75`.
pub struct UnigramTable {
    table: Vec<u32>,
}

impl UnigramTable {
    pub fn build(vocab: &Vocabulary) -> Self {
        let n = vocab.len();
        let mut table = vec![0u32; TABLE_SIZE];
        if n == 0 {
            return UnigramTable { table };
        }

        let total_power: f64 = vocab.entries().iter().map(|e| (e.cn as f64).powf(POWER)).sum();
        let mut idx = 0usize;
        let mut cumulative = if total_power > 0.0 {
            (vocab.entry(0).cn as f64).powf(POWER) / total_power
        } else {
            0.0
        };

        for slot in table.iter_mut() {
            *slot = idx as u32;
            if (idx as f64 / TABLE_SIZE as f64) > cumulative && idx < n - 1 {
                idx += 1;
                if total_power > 0.0 {
                    cumulative += (vocab.entry(idx).cn as f64).powf(POWER) / total_power;
                }
            }
        }

        UnigramTable { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Draws one negative-sample vocabulary index from a fresh 64-bit
    /// random draw, remapping a table hit on the sentence-boundary
    /// entry (index 0) to a uniform draw over `[1, vocab_len)`.
    /// `vocab_len` is `|V|`.
    pub fn sample(&self, rng: &mut Rng, vocab_len: usize) -> usize {
        let r = rng.next_u64();
        let idx = self.table[((r >> 16) as usize) % self.table.len()];
        if idx == 0 {
            let remapped = rng.next_u64() % (vocab_len as u64 - 1) + 1;
            remapped as usize
        } else {
            idx as usize
        }
    }

    /// Draws `k` negative samples distinct from `target`, skipping and
    /// re-drawing on a collision.
    pub fn sample_k(&self, k: u32, target: usize, vocab_len: usize, rng: &mut Rng) -> Vec<usize> {
        let mut out = Vec::with_capacity(k as usize);
        while out.len() < k as usize {
            let candidate = self.sample(rng, vocab_len);
            if candidate != target {
                out.push(candidate);
            }
        }
        out
    }
}
