use std::io::{self, Read};

/// Reserved token marking a sentence boundary. Always vocabulary index 0.
pub const SENTENCE_BOUNDARY: &[u8] = b"</s>";

/// Tokens longer than this are truncated.
const MAX_TOKEN_LEN: usize = 99;

/// Splits a byte stream into whitespace/tab/LF-delimited tokens, emitting a
/// synthetic [`SENTENCE_BOUNDARY`] token for every line feed. `CR` bytes are
/// skipped. This mirrors the original `ReadWord` byte-at-a-time reader: the
/// token text itself is returned as raw bytes since the corpus is
/// UTF-8-agnostic.
pub struct TokenReader<R> {
    inner: R,
    pending_boundary: bool,
}

impl<R: Read> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        TokenReader {
            inner,
            pending_boundary: false,
        }
    }

    /// Reads the next token. Returns `Ok(None)` once the underlying reader
    /// is exhausted and no token remains to emit.
    pub fn read_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.pending_boundary {
            self.pending_boundary = false;
            return Ok(Some(SENTENCE_BOUNDARY.to_vec()));
        }

        let mut word = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = self.inner.read(&mut byte)?;
            if n == 0 {
                return Ok(if word.is_empty() { None } else { Some(word) });
            }
            let ch = byte[0];
            if ch == b'\r' {
                continue;
            }
            if ch == b' ' || ch == b'\t' || ch == b'\n' {
                if !word.is_empty() {
                    if ch == b'\n' {
                        // A word immediately followed by a newline still
                        // yields a boundary token on the next call.
                        self.pending_boundary = true;
                    }
                    return Ok(Some(word));
                }
                if ch == b'\n' {
                    return Ok(Some(SENTENCE_BOUNDARY.to_vec()));
                }
                continue;
            }
            if word.len() < MAX_TOKEN_LEN {
                word.push(ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tokens(input: &str) -> Vec<Vec<u8>> {
        let mut reader = TokenReader::new(Cursor::new(input.as_bytes().to_vec()));
        let mut out = Vec::new();
        while let Some(tok) = reader.read_token().unwrap() {
            out.push(tok);
        }
        out
    }

    #[test]
    fn splits_on_whitespace_and_emits_boundary() {
        let toks = tokens("a a b c\na b a");
        let words: Vec<String> = toks
            .into_iter()
            .map(|t| String::from_utf8(t).unwrap())
            .collect();
        assert_eq!(words, vec!["a", "a", "b", "c", "</s>", "a", "b", "a"]);
    }

    #[test]
    fn ignores_carriage_return() {
        let toks = tokens("a\r\nb");
        let words: Vec<String> = toks
            .into_iter()
            .map(|t| String::from_utf8(t).unwrap())
            .collect();
        assert_eq!(words, vec!["a", "</s>", "b"]);
    }

    #[test]
    fn truncates_long_tokens() {
        let long = "x".repeat(250);
        let toks = tokens(&long);
        assert_eq!(toks[0].len(), MAX_TOKEN_LEN);
    }

    #[test]
    fn tabs_split_tokens() {
        let toks = tokens("a\tb");
        assert_eq!(toks.len(), 2);
    }
}
