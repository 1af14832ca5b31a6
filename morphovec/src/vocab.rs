use std::io::{BufRead, Read, Write};
use std::sync::Arc;

use crate::error::MorphovecError;
use crate::hashing::word_hash;
use crate::huffman;
use crate::token::TokenReader;
use crate::Result;

/// Size of the linear-probe hash table backing [`Vocabulary`] lookups.
/// Load factor is capped at 0.7 before a [`Vocabulary::ingest`]
/// triggers a reduction pass.
const VOCAB_HASH_SIZE: usize = 30_000_000;
const LOAD_FACTOR_CAP: f64 = 0.7;
const EMPTY: i32 = -1;

/// A resolved reference to a prefix, root, or suffix in the vocabulary,
/// carried by [`VocabEntry`] after the morphology join.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphemeRef {
    pub index: u32,
    pub weight: f32,
}

/// A single vocabulary entry: word text, frequency, Huffman path, and
/// (once joined) its morpheme reference lists.
#[derive(Clone, Debug)]
pub struct VocabEntry {
    pub word: Vec<u8>,
    pub cn: u64,
    /// Huffman code bits, most-significant bit (root) first. Length <= 40.
    pub code: Vec<u8>,
    /// Internal Huffman node indices along the root path, in `[0, |V|-1)`.
    pub path: Vec<u32>,
    /// Shared with the owning [`crate::morphology::MorphologyRecord`] (an
    /// `Arc` clone, not a deep copy) once the morphology join runs.
    pub prefixes: Arc<[MorphemeRef]>,
    pub roots: Arc<[MorphemeRef]>,
    pub suffixes: Arc<[MorphemeRef]>,
}

impl VocabEntry {
    fn new(word: Vec<u8>) -> Self {
        VocabEntry {
            word,
            cn: 0,
            code: Vec::new(),
            path: Vec::new(),
            prefixes: Arc::from(Vec::new()),
            roots: Arc::from(Vec::new()),
            suffixes: Arc::from(Vec::new()),
        }
    }

    /// Total number of morpheme refs attached to this entry.
    pub fn morpheme_count(&self) -> usize {
        self.prefixes.len() + self.roots.len() + self.suffixes.len()
    }
}

/// Frequency-sorted dictionary of tokens with a linear-probe hash index.
///
/// Index 0 is always the sentence boundary `"</s>"`; indices `1..len()`
/// are sorted by descending count once [`Vocabulary::build_from_corpus`]
/// or [`Vocabulary::load`] finalizes the vocabulary.
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
    index: Vec<i32>,
    min_reduce: u64,
    train_words: u64,
}

impl Vocabulary {
    fn empty() -> Self {
        let mut vocab = Vocabulary {
            entries: Vec::new(),
            index: vec![EMPTY; VOCAB_HASH_SIZE],
            min_reduce: 1,
            train_words: 0,
        };
        let boundary = VocabEntry::new(crate::token::SENTENCE_BOUNDARY.to_vec());
        vocab.entries.push(boundary);
        let h = word_hash(crate::token::SENTENCE_BOUNDARY, VOCAB_HASH_SIZE);
        vocab.index[h] = 0;
        vocab
    }

    /// Builds a vocabulary by streaming whitespace-delimited tokens from
    /// `reader`, then sort-finalizing with the given minimum count.
    pub fn build_from_corpus<R: Read>(reader: R, min_count: u64) -> Result<Self> {
        let mut vocab = Vocabulary::empty();
        let mut tokens = TokenReader::new(reader);
        while let Some(word) = tokens.read_token()? {
            vocab.ingest(&word);
        }
        vocab.sort_vocab(min_count);
        Ok(vocab)
    }

    /// Loads a previously saved `"<word> <count>\n"` vocabulary, then
    /// sort-finalizes it the same way a freshly built one is.
    pub fn load<R: Read>(reader: R, min_count: u64) -> Result<Self> {
        let mut vocab = Vocabulary::empty();
        let mut tokens = TokenReader::new(reader);
        while let Some(word) = tokens.read_token()? {
            let count_tok = tokens.read_token()?.unwrap_or_default();
            let count: u64 = std::str::from_utf8(&count_tok)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
            // Discard the synthetic boundary token produced by the newline
            // terminating this line (unless EOF truncates it away).
            let _ = tokens.read_token()?;

            let idx = vocab.add_or_get(&word);
            vocab.entries[idx].cn = count;
        }
        vocab.sort_vocab(min_count);
        Ok(vocab)
    }

    /// Writes `"<word> <count>\n"` lines in current vocabulary order.
    pub fn save<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for entry in &self.entries {
            writer.write_all(&entry.word)?;
            writer.write_all(b" ")?;
            writer.write_all(entry.cn.to_string().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn ingest(&mut self, word: &[u8]) {
        match self.lookup(word) {
            Some(idx) => self.entries[idx].cn += 1,
            None => {
                let idx = self.add_or_get(word);
                self.entries[idx].cn = 1;
            }
        }
        if self.entries.len() as f64 > LOAD_FACTOR_CAP * VOCAB_HASH_SIZE as f64 {
            self.reduce_vocab();
        }
    }

    fn add_or_get(&mut self, word: &[u8]) -> usize {
        if let Some(idx) = self.lookup(word) {
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push(VocabEntry::new(word.to_vec()));
        let mut h = word_hash(word, VOCAB_HASH_SIZE);
        while self.index[h] != EMPTY {
            h = (h + 1) % VOCAB_HASH_SIZE;
        }
        self.index[h] = idx as i32;
        idx
    }

    /// Looks up `word`, returning its current vocabulary index if present.
    pub fn lookup(&self, word: &[u8]) -> Option<usize> {
        let mut h = word_hash(word, VOCAB_HASH_SIZE);
        loop {
            let slot = self.index[h];
            if slot == EMPTY {
                return None;
            }
            if self.entries[slot as usize].word == word {
                return Some(slot as usize);
            }
            h = (h + 1) % VOCAB_HASH_SIZE;
        }
    }

    /// Drops entries with `cn <= min_reduce` (index 0 is exempt, preserving
    /// the "index 0 is always `</s>`" invariant even in the pathological
    /// case where the sentinel's count has not yet risen above the
    /// threshold), rebuilds the hash table, and raises the threshold for
    /// next time.
    fn reduce_vocab(&mut self) {
        let threshold = self.min_reduce;
        let before = self.entries.len();
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .enumerate()
            .filter(|(i, e)| *i == 0 || e.cn > threshold)
            .map(|(_, e)| e)
            .collect();
        self.rebuild_index();
        self.min_reduce += 1;
        log::debug!(
            "reduce_vocab: {} -> {} entries (threshold now {})",
            before,
            self.entries.len(),
            self.min_reduce
        );
    }

    /// Sorts indices `1..` by descending count, drops entries below
    /// `min_count`, rebuilds the hash table, and records `train_words`.
    fn sort_vocab(&mut self, min_count: u64) {
        let mut rest = self.entries.split_off(1);
        rest.sort_by(|a, b| b.cn.cmp(&a.cn));
        rest.retain(|e| e.cn >= min_count);
        self.entries.extend(rest);
        self.rebuild_index();
        self.train_words = self.entries.iter().map(|e| e.cn).sum();
        log::info!(
            "sort_vocab: {} types, {} training tokens",
            self.entries.len(),
            self.train_words
        );
    }

    /// Builds per-word Huffman codes over the current (sorted) vocabulary.
    /// Only needed when hierarchical softmax is active; callers skip this
    /// when training uses negative sampling only.
    pub fn build_huffman_codes(&mut self) {
        huffman::build_huffman_codes(&mut self.entries);
    }

    fn rebuild_index(&mut self) {
        for slot in self.index.iter_mut() {
            *slot = EMPTY;
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            let mut h = word_hash(&entry.word, VOCAB_HASH_SIZE);
            while self.index[h] != EMPTY {
                h = (h + 1) % VOCAB_HASH_SIZE;
            }
            self.index[h] = idx as i32;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn train_words(&self) -> u64 {
        self.train_words
    }

    pub fn entry(&self, idx: usize) -> &VocabEntry {
        &self.entries[idx]
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [VocabEntry] {
        &mut self.entries
    }
}

/// Opens `path`, reading its vocabulary the same way
/// [`Vocabulary::build_from_corpus`] does, converting a missing file into
/// [`MorphovecError::MissingCorpus`].
pub fn build_from_corpus_file(
    path: &std::path::Path,
    min_count: u64,
) -> Result<(Vocabulary, u64)> {
    let file = std::fs::File::open(path)
        .map_err(|_| MorphovecError::MissingCorpus(path.to_path_buf()))?;
    let reader = std::io::BufReader::new(file);
    let vocab = Vocabulary::build_from_corpus(reader, min_count)?;
    let file_size = std::fs::metadata(path)?.len();
    Ok((vocab, file_size))
}

pub fn load_saved_vocab<R: BufRead>(reader: R, min_count: u64) -> Result<Vocabulary> {
    Vocabulary::load(reader, min_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn vocab_build_counts_both_literal_and_synthesized_boundaries() {
        // Literal `</s>` token plus the trailing newline's synthetic
        // boundary both count toward index 0.
        let vocab = Vocabulary::build_from_corpus(
            Cursor::new(b"a a b c </s> a b a\n".to_vec()),
            1,
        )
        .unwrap();
        assert_eq!(vocab.len(), 4);
        let words: Vec<String> = vocab
            .entries()
            .iter()
            .map(|e| String::from_utf8(e.word.clone()).unwrap())
            .collect();
        assert_eq!(words, vec!["</s>", "a", "b", "c"]);
        let counts: Vec<u64> = vocab.entries().iter().map(|e| e.cn).collect();
        assert_eq!(counts, vec![2, 4, 2, 1]);
    }

    #[test]
    fn invariant_counts_non_increasing() {
        let vocab = Vocabulary::build_from_corpus(
            Cursor::new(b"z z z y y x w\nw w w w".to_vec()),
            1,
        )
        .unwrap();
        for pair in vocab.entries()[1..].windows(2) {
            assert!(pair[0].cn >= pair[1].cn);
        }
        assert_eq!(vocab.entry(0).word, crate::token::SENTENCE_BOUNDARY);
    }

    #[test]
    fn min_count_drops_rare_words() {
        let vocab =
            Vocabulary::build_from_corpus(Cursor::new(b"a a a b".to_vec()), 2).unwrap();
        assert!(vocab.lookup(b"b").is_none());
        assert!(vocab.lookup(b"a").is_some());
    }

    #[test]
    fn save_and_load_round_trip() {
        let vocab =
            Vocabulary::build_from_corpus(Cursor::new(b"a a b c\na b a".to_vec()), 1).unwrap();
        let mut buf = Vec::new();
        vocab.save(&mut buf).unwrap();
        let reloaded = Vocabulary::load(Cursor::new(buf), 1).unwrap();
        assert_eq!(vocab.len(), reloaded.len());
        for (a, b) in vocab.entries().iter().zip(reloaded.entries().iter()) {
            assert_eq!(a.word, b.word);
            assert_eq!(a.cn, b.cn);
        }
    }

    #[test]
    fn lookup_absent_word_returns_none() {
        let vocab = Vocabulary::build_from_corpus(Cursor::new(b"a b c".to_vec()), 1).unwrap();
        assert_eq!(vocab.lookup(b"nonexistent"), None);
    }
}
