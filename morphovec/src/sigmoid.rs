//! Precomputed sigmoid lookup table.

/// Number of table entries.
const TABLE_SIZE: usize = 1000;
/// The table covers `x ∈ (-EDGE, EDGE)`; outside this range σ is treated
/// as saturated (exactly 0.0 or 1.0) by callers.
const EDGE: f32 = 6.0;

/// A 1000-entry table of `σ(x)` over `x ∈ (-6, 6)`, used by the training
/// kernel in place of evaluating `exp` on the hot path.
pub struct SigmoidTable {
    table: [f32; TABLE_SIZE],
}

impl SigmoidTable {
    pub fn new() -> Self {
        let mut table = [0f32; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            let x = (2.0 * i as f32 / TABLE_SIZE as f32 - 1.0) * EDGE;
            *slot = 1.0 / (1.0 + (-x).exp());
        }
        SigmoidTable { table }
    }

    /// Looks up `σ(x)`, saturating to 0.0/1.0 outside `(-6, 6)`.
    pub fn sigmoid(&self, x: f32) -> f32 {
        if x <= -EDGE {
            return 0.0;
        }
        if x >= EDGE {
            return 1.0;
        }
        let idx = ((x + EDGE) * TABLE_SIZE as f32 / (2.0 * EDGE)) as usize;
        self.table[idx.min(TABLE_SIZE - 1)]
    }

    /// Whether `|x| > 6`, the saturation condition the training kernel
    /// uses to skip an update.
    pub fn is_saturated(x: f32) -> bool {
        x.abs() > EDGE
    }
}

impl Default for SigmoidTable {
    fn default() -> Self {
        Self::new()
    }
}
