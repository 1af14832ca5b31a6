//! Morphological decomposition table loader.
//!
//! Each record maps a word to up to three lists of morpheme references
//! (prefixes, roots, suffixes), resolved against the vocabulary and joined
//! into [`crate::vocab::VocabEntry`] rows before training starts.

use std::io::BufRead;
use std::sync::Arc;

use crate::hashing::word_hash;
use crate::vocab::{MorphemeRef, Vocabulary};

/// Size of the morphology table's own linear-probe index. Kept much
/// smaller than `VOCAB_HASH_SIZE` since morphology tables are typically a
/// fraction of the vocabulary size.
const MORPH_HASH_SIZE: usize = 2_000_000;
const EMPTY: i32 = -1;

/// A single morphology-table record: the decomposed word together with its
/// resolved prefix/root/suffix vocabulary references.
#[derive(Clone, Debug)]
pub struct MorphologyRecord {
    pub word: Vec<u8>,
    pub prefixes: Arc<[MorphemeRef]>,
    pub roots: Arc<[MorphemeRef]>,
    pub suffixes: Arc<[MorphemeRef]>,
}

/// Loaded morphology table, keyed by word with the same hash+probe scheme
/// as [`Vocabulary`] but in its own, independently sized table.
pub struct MorphologyTable {
    records: Vec<MorphologyRecord>,
    index: Vec<i32>,
}

impl MorphologyTable {
    fn empty() -> Self {
        MorphologyTable {
            records: Vec::new(),
            index: vec![EMPTY; MORPH_HASH_SIZE],
        }
    }

    fn contains(&self, word: &[u8]) -> bool {
        self.lookup(word).is_some()
    }

    fn lookup(&self, word: &[u8]) -> Option<usize> {
        let mut h = word_hash(word, MORPH_HASH_SIZE);
        loop {
            let slot = self.index[h];
            if slot == EMPTY {
                return None;
            }
            if self.records[slot as usize].word == word {
                return Some(slot as usize);
            }
            h = (h + 1) % MORPH_HASH_SIZE;
        }
    }

    fn insert(&mut self, record: MorphologyRecord) {
        let idx = self.records.len();
        let mut h = word_hash(&record.word, MORPH_HASH_SIZE);
        while self.index[h] != EMPTY {
            h = (h + 1) % MORPH_HASH_SIZE;
        }
        self.index[h] = idx as i32;
        self.records.push(record);
    }

    /// Parses `reader` as a `word#prefixList#rootList#sufList` morphology
    /// table, resolving each entry against `vocab`. Lines with fewer than
    /// four `#`-delimited fields are skipped, as are words absent from
    /// the vocabulary, equal to index 0, or already present in this
    /// table.
    pub fn load<R: BufRead>(reader: R, vocab: &Vocabulary) -> std::io::Result<Self> {
        let mut table = MorphologyTable::empty();
        for line in reader.lines() {
            let line = line?;
            // CRLF is normalized away by `BufRead::lines`, which already
            // strips the trailing `\n` and, on Windows-style input, the
            // stray `\r` would otherwise remain; strip it explicitly too.
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('#').collect();
            if fields.len() < 4 {
                continue;
            }
            let word = fields[0].as_bytes();

            let Some(word_idx) = vocab.lookup(word) else {
                continue;
            };
            if word_idx == 0 {
                continue;
            }
            if table.contains(word) {
                continue;
            }

            let prefixes = Arc::from(resolve_list(fields[1], vocab));
            let roots = Arc::from(resolve_list(fields[2], vocab));
            let suffixes = Arc::from(resolve_list(fields[3], vocab));

            table.insert(MorphologyRecord {
                word: word.to_vec(),
                prefixes,
                roots,
                suffixes,
            });
        }
        Ok(table)
    }

    /// Shares each record's ref lists with the matching vocabulary entry
    /// (index ≥1). The lists are `Arc`-shared, not copied: the vocab entry
    /// and this table's record end up pointing at the same allocation.
    pub fn join(&self, vocab: &mut Vocabulary) {
        for record in &self.records {
            if let Some(idx) = vocab.lookup(&record.word) {
                if idx == 0 {
                    continue;
                }
                let entry = &mut vocab.entries_mut()[idx];
                entry.prefixes = Arc::clone(&record.prefixes);
                entry.roots = Arc::clone(&record.roots);
                entry.suffixes = Arc::clone(&record.suffixes);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Resolves a single `,`-separated morpheme list field. A field that is
/// exactly a single space means "none" and resolves to an empty list;
/// each comma-separated element's "main word" (the longest
/// whitespace-separated subtoken, first on ties) is looked up in `vocab`,
/// dropping entries absent from the vocabulary or equal to index 0.
fn resolve_list(field: &str, vocab: &Vocabulary) -> Vec<MorphemeRef> {
    if field == " " || field.is_empty() {
        return Vec::new();
    }
    field
        .split(',')
        .filter_map(|phrase| {
            let main = main_word(phrase)?;
            let idx = vocab.lookup(main.as_bytes())?;
            if idx == 0 {
                return None;
            }
            Some(MorphemeRef {
                index: idx as u32,
                weight: 1.0,
            })
        })
        .collect()
}

/// The longest whitespace-separated subtoken of `phrase`, first on ties.
fn main_word(phrase: &str) -> Option<&str> {
    phrase
        .split_whitespace()
        .fold(None, |best: Option<&str>, tok| match best {
            Some(b) if b.len() >= tok.len() => Some(b),
            _ => Some(tok),
        })
}
