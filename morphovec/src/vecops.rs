//! Small dense-vector helpers used on the training hot path: dot product
//! and scaled accumulation over `f32` slices.

/// `a . b`.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

/// `dst += scale * src`, element-wise.
pub fn add_scaled(dst: &mut [f32], src: &[f32], scale: f32) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d += scale * s;
    }
}

/// `dst += src`, element-wise.
pub fn add_assign(dst: &mut [f32], src: &[f32]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d += s;
    }
}

/// Zeroes `dst`.
pub fn clear(dst: &mut [f32]) {
    for d in dst.iter_mut() {
        *d = 0.0;
    }
}

/// `dst = dst / scale`, element-wise. No-op for `scale == 0`.
pub fn scale_in_place(dst: &mut [f32], scale: f32) {
    if scale == 0.0 {
        return;
    }
    for d in dst.iter_mut() {
        *d /= scale;
    }
}
