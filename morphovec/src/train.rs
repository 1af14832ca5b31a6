//! The CBOW / skip-gram training kernel and its worker scheduling: `T`
//! OS threads, each pinned to a contiguous byte range of the corpus
//! file, updating the shared parameter matrices without any
//! synchronization (Hogwild).

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::config::{Architecture, Config};
use crate::loss::{hierarchical_softmax_update, negative_sampling_update};
use crate::params::ParameterStore;
use crate::sampling::{dynamic_shrink, subsample_keep, Rng, UnigramTable};
use crate::sigmoid::SigmoidTable;
use crate::token::TokenReader;
use crate::vecops::{add_assign, clear};
use crate::vocab::Vocabulary;
use crate::Result;

/// Longest buffered run of in-vocabulary words between two sentence
/// boundaries, matching the original toolkit's fixed sentence buffer.
const MAX_SENTENCE_LENGTH: usize = 1000;
/// Worker-local word count interval at which `alpha` is resynced against
/// the shared `word_count_actual` counter.
const ALPHA_REFRESH_INTERVAL: u64 = 10_000;

/// Final counters reported once every worker has joined.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSummary {
    pub word_count_actual: u64,
    pub final_alpha: f32,
}

/// Runs training to completion: spawns `config.threads` scoped worker
/// threads, each seeking to its own byte range of `corpus_path` and
/// repeating for `config.epochs` epochs, then joins them all.
pub fn train(
    vocab: &Vocabulary,
    params: &ParameterStore,
    config: &Config,
    corpus_path: &Path,
    file_size: u64,
) -> Result<TrainingSummary> {
    let unigram = if config.objective.negative_samples > 0 {
        Some(UnigramTable::build(vocab))
    } else {
        None
    };
    let sigmoid = SigmoidTable::new();
    let word_count_actual = AtomicU64::new(0);
    let train_words = vocab.train_words().max(1);

    log::info!(
        "training: {} threads, {} epochs, {} training tokens",
        config.threads,
        config.epochs,
        train_words
    );

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::new();
        for worker_id in 0..config.threads {
            let unigram = unigram.as_ref();
            let sigmoid = &sigmoid;
            let word_count_actual = &word_count_actual;
            handles.push(scope.spawn(move || {
                run_worker(
                    worker_id,
                    vocab,
                    params,
                    config,
                    sigmoid,
                    unigram,
                    word_count_actual,
                    corpus_path,
                    file_size,
                    train_words,
                )
            }));
        }
        for handle in handles {
            handle.join().expect("training worker thread panicked")?;
        }
        Ok(())
    })?;

    let total = word_count_actual.load(Ordering::Relaxed);
    Ok(TrainingSummary {
        word_count_actual: total,
        final_alpha: current_alpha(config, total, train_words),
    })
}

/// `alpha <- max(alpha0 * 1e-4, alpha0 * (1 - n / (E*N + 1)))`.
fn current_alpha(config: &Config, word_count_actual: u64, train_words: u64) -> f32 {
    let n = word_count_actual as f32;
    let denom = (config.epochs as u64 * train_words + 1) as f32;
    (config.alpha0 * (1.0 - n / denom)).max(config.alpha0 * 0.0001)
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    worker_id: u32,
    vocab: &Vocabulary,
    params: &ParameterStore,
    config: &Config,
    sigmoid: &SigmoidTable,
    unigram: Option<&UnigramTable>,
    word_count_actual: &AtomicU64,
    corpus_path: &Path,
    file_size: u64,
    train_words: u64,
) -> Result<()> {
    let dims = config.dims as usize;
    let start_offset = file_size * worker_id as u64 / config.threads as u64;
    let words_per_worker = train_words / config.threads as u64;

    let mut rng = Rng::new(worker_id as u64);
    let mut h = vec![0f32; dims];
    let mut e = vec![0f32; dims];
    let mut m = vec![0f32; dims];

    let mut alpha = config.alpha0;
    let mut local_word_count: u64 = 0;
    let mut last_synced: u64 = 0;

    for epoch in 0..config.epochs {
        log::debug!("worker {} starting epoch {}", worker_id, epoch);
        let file = File::open(corpus_path)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(start_offset))?;
        let mut tokens = TokenReader::new(reader);

        let mut sentence: Vec<usize> = Vec::with_capacity(MAX_SENTENCE_LENGTH);
        let mut epoch_word_count: u64 = 0;

        loop {
            if epoch_word_count > words_per_worker {
                break;
            }
            let token = match tokens.read_token()? {
                Some(t) => t,
                None => break,
            };
            let Some(idx) = vocab.lookup(&token) else {
                continue;
            };

            epoch_word_count += 1;
            local_word_count += 1;

            if idx == 0 {
                if !sentence.is_empty() {
                    train_sentence(
                        &sentence, vocab, params, config, sigmoid, unigram, &mut rng, &mut h,
                        &mut e, &mut m, alpha,
                    );
                    sentence.clear();
                }
            } else if sentence.len() < MAX_SENTENCE_LENGTH
                && subsample_keep(vocab.entry(idx).cn, config.sample, train_words, &mut rng)
            {
                sentence.push(idx);
            }

            if local_word_count - last_synced >= ALPHA_REFRESH_INTERVAL {
                last_synced = local_word_count;
                let total = word_count_actual.fetch_add(ALPHA_REFRESH_INTERVAL, Ordering::Relaxed)
                    + ALPHA_REFRESH_INTERVAL;
                alpha = current_alpha(config, total, train_words);
            }
        }

        if !sentence.is_empty() {
            train_sentence(
                &sentence, vocab, params, config, sigmoid, unigram, &mut rng, &mut h, &mut e,
                &mut m, alpha,
            );
        }
    }

    word_count_actual.fetch_add(local_word_count - last_synced, Ordering::Relaxed);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn train_sentence(
    sentence: &[usize],
    vocab: &Vocabulary,
    params: &ParameterStore,
    config: &Config,
    sigmoid: &SigmoidTable,
    unigram: Option<&UnigramTable>,
    rng: &mut Rng,
    h: &mut [f32],
    e: &mut [f32],
    m: &mut [f32],
    alpha: f32,
) {
    for center_pos in 0..sentence.len() {
        let shrink = dynamic_shrink(config.window, rng);
        let effective_window = (config.window - shrink) as usize;
        let start = center_pos.saturating_sub(effective_window);
        let end = (center_pos + effective_window + 1).min(sentence.len());
        let context: Vec<usize> = (start..end)
            .filter(|&p| p != center_pos)
            .map(|p| sentence[p])
            .collect();
        if context.is_empty() {
            continue;
        }
        let center = sentence[center_pos];

        match config.architecture {
            Architecture::Cbow => train_cbow(
                &context, center, vocab, params, config, sigmoid, unigram, rng, h, e, m, alpha,
            ),
            Architecture::SkipGram => train_skip_gram(
                &context, center, vocab, params, config, sigmoid, unigram, rng, h, e, alpha,
            ),
        }
    }
}

/// `m(u) = W_in[u]` if `u` has no morpheme refs, else the average of
/// `u`'s own row and the mean of its prefix/root/suffix rows.
fn morpheme_vector(word: usize, vocab: &Vocabulary, params: &ParameterStore, out: &mut [f32]) {
    let entry = vocab.entry(word);
    let n = entry.morpheme_count();
    let own = params.input.row(word);
    if n == 0 {
        out.copy_from_slice(own);
        return;
    }

    clear(out);
    for r in entry
        .prefixes
        .iter()
        .chain(entry.roots.iter())
        .chain(entry.suffixes.iter())
    {
        add_assign(out, params.input.row(r.index as usize));
    }
    let n = n as f32;
    for (o, &own_d) in out.iter_mut().zip(own.iter()) {
        *o = 0.5 * own_d + 0.5 * (*o / n);
    }
}

#[allow(clippy::too_many_arguments)]
fn train_cbow(
    context: &[usize],
    center: usize,
    vocab: &Vocabulary,
    params: &ParameterStore,
    config: &Config,
    sigmoid: &SigmoidTable,
    unigram: Option<&UnigramTable>,
    rng: &mut Rng,
    h: &mut [f32],
    e: &mut [f32],
    m: &mut [f32],
    alpha: f32,
) {
    clear(h);
    for &u in context {
        morpheme_vector(u, vocab, params, m);
        add_assign(h, m);
    }
    let count = context.len() as f32;
    for v in h.iter_mut() {
        *v /= count;
    }

    clear(e);
    apply_objective(h, e, center, vocab, params, config, sigmoid, unigram, rng, alpha);

    // No division by n or |C| on the way back -- the gradient is
    // broadcast uniformly to every referenced row. This asymmetry with
    // the forward-pass averaging is intentional, not a bug.
    for &u in context {
        add_assign(params.input.row_mut(u), e);
        let entry = vocab.entry(u);
        for r in entry
            .prefixes
            .iter()
            .chain(entry.roots.iter())
            .chain(entry.suffixes.iter())
        {
            add_assign(params.input.row_mut(r.index as usize), e);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn train_skip_gram(
    context: &[usize],
    center: usize,
    vocab: &Vocabulary,
    params: &ParameterStore,
    config: &Config,
    sigmoid: &SigmoidTable,
    unigram: Option<&UnigramTable>,
    rng: &mut Rng,
    h: &mut [f32],
    e: &mut [f32],
    alpha: f32,
) {
    for &u in context {
        h.copy_from_slice(params.input.row(u));
        clear(e);
        apply_objective(h, e, center, vocab, params, config, sigmoid, unigram, rng, alpha);
        add_assign(params.input.row_mut(u), e);
    }
}

/// Applies whichever of hierarchical softmax / negative sampling
/// `config.objective` enables, against `target`'s Huffman path and/or
/// `K` unigram-table draws, accumulating into `e`.
#[allow(clippy::too_many_arguments)]
fn apply_objective(
    h: &[f32],
    e: &mut [f32],
    target: usize,
    vocab: &Vocabulary,
    params: &ParameterStore,
    config: &Config,
    sigmoid: &SigmoidTable,
    unigram: Option<&UnigramTable>,
    rng: &mut Rng,
    alpha: f32,
) {
    if config.objective.hierarchical_softmax {
        if let Some(hs) = &params.hs {
            let entry = vocab.entry(target);
            hierarchical_softmax_update(h, e, hs, &entry.code, &entry.path, alpha, sigmoid);
        }
    }
    if config.objective.negative_samples > 0 {
        if let (Some(neg), Some(table)) = (&params.neg, unigram) {
            let negatives =
                table.sample_k(config.objective.negative_samples, target, vocab.len(), rng);
            negative_sampling_update(h, e, neg, target, &negatives, alpha, sigmoid);
        }
    }
}
