//! Vector and cluster-assignment writers.
//!
//! Neither output carries a header line (unlike the original word2vec
//! format's `"<vocab_size> <dim>\n"` prefix) -- the morphology-aware
//! toolkit this crate reimplements dropped it.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::kmeans::ClusterAssignment;
use crate::shared::SharedMatrix;
use crate::vocab::Vocabulary;

/// Writes one line per vocabulary entry: the word, a space, then `dims`
/// floats (text mode: `"%lf "`-style space-separated decimal; binary
/// mode: 4-byte little-endian floats), terminated by `"\n"`.
pub fn write_vectors<W: Write>(
    mut writer: W,
    vocab: &Vocabulary,
    input: &SharedMatrix,
    binary: bool,
) -> io::Result<()> {
    for (idx, entry) in vocab.entries().iter().enumerate() {
        writer.write_all(&entry.word)?;
        writer.write_all(b" ")?;
        let row = input.row(idx);
        if binary {
            for &value in row {
                writer.write_f32::<LittleEndian>(value)?;
            }
        } else {
            for &value in row {
                write!(writer, "{:.6} ", value)?;
            }
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Writes `"<word> <clusterId>\n"` per vocabulary entry, in vocabulary
/// order.
pub fn write_clusters<W: Write>(
    mut writer: W,
    vocab: &Vocabulary,
    assignment: &ClusterAssignment,
) -> io::Result<()> {
    for (idx, entry) in vocab.entries().iter().enumerate() {
        writer.write_all(&entry.word)?;
        write!(writer, " {}\n", assignment.cluster_of[idx])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn test_vocab() -> Vocabulary {
        Vocabulary::build_from_corpus(Cursor::new(b"a a b".to_vec()), 1).unwrap()
    }

    #[test]
    fn text_output_has_one_line_per_word_with_dims_floats() {
        let vocab = test_vocab();
        let input = SharedMatrix::zeros(vocab.len(), 2);
        let mut buf = Vec::new();
        write_vectors(&mut buf, &vocab, &input, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), vocab.len());
        for (line, entry) in lines.iter().zip(vocab.entries().iter()) {
            let word = String::from_utf8(entry.word.clone()).unwrap();
            assert!(line.starts_with(&word));
            let tail = line[word.len()..].trim();
            let floats: Vec<&str> = tail.split_whitespace().collect();
            assert_eq!(floats.len(), 2);
        }
    }

    #[test]
    fn binary_output_round_trips_floats() {
        let vocab = test_vocab();
        let input = SharedMatrix::zeros(vocab.len(), 2);
        input.row_mut(0).copy_from_slice(&[1.5, -2.5]);
        let mut buf = Vec::new();
        write_vectors(&mut buf, &vocab, &input, true).unwrap();

        // word + space + 8 bytes (2 f32) + newline for entry 0.
        let word_len = vocab.entry(0).word.len();
        let float_start = word_len + 1;
        let bytes = &buf[float_start..float_start + 8];
        let a = f32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let b = f32::from_le_bytes(bytes[4..8].try_into().unwrap());
        assert_eq!(a, 1.5);
        assert_eq!(b, -2.5);
    }

    #[test]
    fn cluster_output_has_word_and_cluster_id_per_line() {
        let vocab = test_vocab();
        let assignment = ClusterAssignment {
            cluster_of: vec![0; vocab.len()],
            k: 1,
        };
        let mut buf = Vec::new();
        write_clusters(&mut buf, &vocab, &assignment).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), vocab.len());
        for line in text.lines() {
            assert!(line.ends_with(" 0"));
        }
    }
}
