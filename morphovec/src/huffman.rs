use crate::vocab::VocabEntry;

/// Sentinel "infinite" frequency for not-yet-populated internal nodes.
const INFINITE_COUNT: u64 = 1_000_000_000_000_000;

/// Pops the smaller of `count[p1]` and `count[p2]` (`p1` favored on ties),
/// advancing whichever pointer was consumed.
fn pick_min(p1: &mut isize, p2: &mut usize, count: &[u64]) -> usize {
    if *p1 >= 0 && count[*p1 as usize] <= count[*p2] {
        let chosen = *p1 as usize;
        *p1 -= 1;
        chosen
    } else {
        let chosen = *p2;
        *p2 += 1;
        chosen
    }
}

/// Builds per-word Huffman codes over `entries` using the standard
/// two-queue, linear-time construction: entries must already be
/// frequency-sorted with `</s>` at index 0. Writes `code` and `path` back
/// into each entry in place.
pub fn build_huffman_codes(entries: &mut [VocabEntry]) {
    let n = entries.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        entries[0].code = Vec::new();
        entries[0].path = Vec::new();
        return;
    }

    let total = 2 * n - 1;
    let mut count = vec![0u64; total];
    let mut parent = vec![0usize; total];
    let mut bit = vec![0u8; total];

    for (i, entry) in entries.iter().enumerate() {
        count[i] = entry.cn;
    }
    for slot in count.iter_mut().skip(n) {
        *slot = INFINITE_COUNT;
    }

    // p1 walks left over leaves/low-frequency nodes; p2 walks right over
    // freshly merged internal nodes.
    let mut p1: isize = n as isize - 1;
    let mut p2: usize = n;

    for a in 0..n - 1 {
        let min1 = pick_min(&mut p1, &mut p2, &count);
        let min2 = pick_min(&mut p1, &mut p2, &count);
        count[n + a] = count[min1] + count[min2];
        parent[min1] = n + a;
        parent[min2] = n + a;
        bit[min2] = 1;
    }

    let root = total - 1;

    for leaf in 0..n {
        let mut nodes = Vec::with_capacity(40);
        let mut bits = Vec::with_capacity(40);
        let mut cur = leaf;
        loop {
            bits.push(bit[cur]);
            nodes.push(cur);
            cur = parent[cur];
            if cur == root {
                break;
            }
        }

        let codelen = nodes.len();
        let mut code = vec![0u8; codelen];
        let mut path = vec![0u32; codelen];
        path[0] = (n - 2) as u32;
        for d in 0..codelen {
            code[d] = bits[codelen - 1 - d];
        }
        for d in 1..codelen {
            path[d] = (nodes[codelen - d] - n) as u32;
        }

        entries[leaf].code = code;
        entries[leaf].path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn fixture(counts: &[u64]) -> Vec<VocabEntry> {
        counts
            .iter()
            .map(|&cn| VocabEntry {
                word: format!("w{}", cn).into_bytes(),
                cn,
                code: Vec::new(),
                path: Vec::new(),
                prefixes: Arc::from(Vec::new()),
                roots: Arc::from(Vec::new()),
                suffixes: Arc::from(Vec::new()),
            })
            .collect()
    }

    #[test]
    fn huffman_code_lengths_match_frequency_order() {
        // counts after removing </s>; prepend a dummy boundary so index 0
        // semantics match production use, but huffman doesn't care about
        // word identity, only counts.
        let mut entries = fixture(&[5, 4, 3, 2, 1]);
        build_huffman_codes(&mut entries);
        let lens: Vec<usize> = entries.iter().map(|e| e.code.len()).collect();
        let mut sorted = lens.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![2, 2, 2, 3, 3]);
    }

    #[test]
    fn codes_form_a_prefix_code() {
        let mut entries = fixture(&[8, 7, 6, 5, 4, 3, 2, 1]);
        build_huffman_codes(&mut entries);
        let codes: Vec<String> = entries
            .iter()
            .map(|e| {
                e.code
                    .iter()
                    .map(|b| if *b == 0 { '0' } else { '1' })
                    .collect::<String>()
            })
            .collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn max_code_length_bounded_for_large_vocab() {
        let counts: Vec<u64> = (1..=2000u64).collect();
        let mut entries = fixture(&counts);
        build_huffman_codes(&mut entries);
        for e in &entries {
            assert!(e.code.len() <= 40);
            assert_eq!(e.code.len(), e.path.len());
        }
    }

    #[test]
    fn path_root_entry_is_fixed() {
        let mut entries = fixture(&[3, 2, 1]);
        let n = entries.len();
        build_huffman_codes(&mut entries);
        for e in &entries {
            assert_eq!(e.path[0], (n - 2) as u32);
        }
    }
}
