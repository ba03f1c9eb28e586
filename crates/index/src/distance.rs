//! Distance functions.

const LANES: usize = 8;

/// Squared Euclidean distance: `Σ (a[i] - b[i])²`.
///
/// Monotonic with true Euclidean distance, so it ranks neighbours the same
/// way without a square root per comparison. Both slices must have the same
/// length; callers validate this before scoring.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    // Independent lane accumulators let the compiler vectorize the loop.
    let mut lanes = [0.0f32; LANES];
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (ca, cb) in a_chunks.zip(b_chunks) {
        for i in 0..LANES {
            let diff = ca[i] - cb[i];
            lanes[i] += diff * diff;
        }
    }

    let mut sum: f32 = lanes.iter().sum();
    for (x, y) in a_tail.iter().zip(b_tail) {
        let diff = x - y;
        sum += diff * diff;
    }
    sum
}
