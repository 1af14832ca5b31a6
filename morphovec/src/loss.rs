//! Hierarchical-softmax and negative-sampling gradient steps. Both
//! operate on a hidden vector `h` and accumulate into a caller-owned
//! gradient buffer `e`; the caller is responsible for broadcasting `e`
//! back to the input rows.

use crate::shared::SharedMatrix;
use crate::sigmoid::SigmoidTable;
use crate::vecops::{add_scaled, dot};

/// One hierarchical-softmax update over a word's full Huffman path.
/// `code`/`path` are the target word's `VocabEntry::code`/`path`. Nodes
/// whose dot product with `h` saturates the sigmoid table (`|h . row| > 6`)
/// are skipped entirely — no gradient is accumulated and the node's row
/// is left untouched.
pub fn hierarchical_softmax_update(
    h: &[f32],
    e: &mut [f32],
    hs: &SharedMatrix,
    code: &[u8],
    path: &[u32],
    alpha: f32,
    sigmoid: &SigmoidTable,
) {
    for (&bit, &node) in code.iter().zip(path.iter()) {
        let row = hs.row_mut(node as usize);
        let f = dot(h, row);
        if SigmoidTable::is_saturated(f) {
            continue;
        }
        let prediction = sigmoid.sigmoid(f);
        let g = (1.0 - f32::from(bit) - prediction) * alpha;
        add_scaled(e, row, g);
        add_scaled(row, h, g);
    }
}

/// One negative-sampling update: the positive `target` (label 1) followed
/// by each of `negatives` (label 0). Unlike hierarchical softmax, a
/// saturated dot product is not skipped — the sigmoid table itself
/// saturates to 0.0/1.0, which already gives the right "label-1 or
/// label-0" asymptotic gradient.
pub fn negative_sampling_update(
    h: &[f32],
    e: &mut [f32],
    neg: &SharedMatrix,
    target: usize,
    negatives: &[usize],
    alpha: f32,
    sigmoid: &SigmoidTable,
) {
    update_one(h, e, neg, target, 1.0, alpha, sigmoid);
    for &negative in negatives {
        update_one(h, e, neg, negative, 0.0, alpha, sigmoid);
    }
}

fn update_one(
    h: &[f32],
    e: &mut [f32],
    neg: &SharedMatrix,
    index: usize,
    label: f32,
    alpha: f32,
    sigmoid: &SigmoidTable,
) {
    let row = neg.row_mut(index);
    let f = dot(h, row);
    let prediction = sigmoid.sigmoid(f);
    let g = (label - prediction) * alpha;
    add_scaled(e, row, g);
    add_scaled(row, h, g);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hs_update_moves_prediction_toward_label() {
        let hs = SharedMatrix::zeros(2, 4);
        let sigmoid = SigmoidTable::new();
        let h = vec![0.1, 0.2, 0.3, 0.4];
        let mut e = vec![0.0; 4];

        hierarchical_softmax_update(&h, &mut e, &hs, &[0], &[0], 1.0, &sigmoid);
        let before = dot(&h, hs.row(0));

        let mut e2 = vec![0.0; 4];
        hierarchical_softmax_update(&h, &mut e2, &hs, &[0], &[0], 1.0, &sigmoid);
        let after = dot(&h, hs.row(0));
        assert!(after > before);
    }

    #[test]
    fn hs_update_skips_saturated_nodes() {
        let hs = SharedMatrix::zeros(1, 2);
        hs.row_mut(0)[0] = 100.0;
        let sigmoid = SigmoidTable::new();
        let h = vec![1.0, 0.0];
        let mut e = vec![0.0; 2];
        let before = hs.row(0).to_vec();
        hierarchical_softmax_update(&h, &mut e, &hs, &[0], &[0], 1.0, &sigmoid);
        assert_eq!(hs.row(0), before.as_slice());
        assert_eq!(e, vec![0.0, 0.0]);
    }

    #[test]
    fn negative_sampling_pushes_target_up_and_negatives_down() {
        let neg = SharedMatrix::zeros(3, 4);
        let sigmoid = SigmoidTable::new();
        let h = vec![0.2, 0.1, -0.1, 0.3];
        let mut e = vec![0.0; 4];

        negative_sampling_update(&h, &mut e, &neg, 1, &[2], 1.0, &sigmoid);

        assert!(dot(&h, neg.row(1)) > 0.0);
        assert!(dot(&h, neg.row(2)) < 0.0);
    }
}
