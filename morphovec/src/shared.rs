//! Lock-free shared mutable matrix, used to give every worker thread
//! unsynchronized write access to the parameter matrices.
//!
//! Concurrent, non-atomic row updates from different threads are allowed
//! to race and overwrite one another; lost updates are accepted as
//! training noise rather than guarded against. The `Send`/`Sync` marker
//! impls needed to share the backing buffer across threads live in the
//! `hogwild` crate rather than here.

use hogwild::Hogwild;

/// A `|V| x D` row-major matrix shared across worker threads without
/// synchronization. Cloning is cheap (an `Arc` bump); every clone points
/// at the same backing storage.
pub struct SharedMatrix {
    dims: usize,
    data: Hogwild<Box<[f32]>>,
}

impl SharedMatrix {
    /// Builds a zero-initialized `rows x dims` matrix.
    pub fn zeros(rows: usize, dims: usize) -> Self {
        let data = vec![0f32; rows * dims].into_boxed_slice();
        SharedMatrix {
            dims,
            data: Hogwild::new(data),
        }
    }

    /// Builds a `rows x dims` matrix, filling each element via `init`
    /// (called once per element in row-major order).
    pub fn from_fn(rows: usize, dims: usize, mut init: impl FnMut() -> f32) -> Self {
        let mut data = Vec::with_capacity(rows * dims);
        for _ in 0..rows * dims {
            data.push(init());
        }
        SharedMatrix {
            dims,
            data: Hogwild::new(data.into_boxed_slice()),
        }
    }

    fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn rows(&self) -> usize {
        self.as_slice().len() / self.dims
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Reads row `idx`. Since writers race unsynchronized, a
    /// concurrently-updated row may be observed partially updated; this
    /// is the accepted Hogwild tradeoff.
    pub fn row(&self, idx: usize) -> &[f32] {
        let start = idx * self.dims;
        &self.as_slice()[start..start + self.dims]
    }

    /// Hands out a mutable view of row `idx`, aliasing the same backing
    /// storage every other clone of this handle sees. Safe to call
    /// concurrently from multiple threads on different (or even the same)
    /// row index; see the module-level Hogwild note.
    #[allow(clippy::mut_from_ref)]
    pub fn row_mut(&self, idx: usize) -> &mut [f32] {
        let start = idx * self.dims;
        let ptr = self.as_slice().as_ptr() as *mut f32;
        unsafe { std::slice::from_raw_parts_mut(ptr.add(start), self.dims) }
    }
}

impl Clone for SharedMatrix {
    fn clone(&self) -> Self {
        SharedMatrix {
            dims: self.dims,
            data: self.data.clone(),
        }
    }
}
