//! Vector index abstraction.
//!
//! Defines the contract every search strategy must honour. The exact
//! brute-force `FlatIndex` is the reference implementation; an approximate
//! strategy would sit behind the same trait and be checked against it.

use crate::error::IndexResult;
use crate::types::{IndexStats, SearchResult};

/// Trait for vector index backends.
///
/// Implementations must support:
/// - Appending vectors concurrently with searches (`&self` everywhere)
/// - Exact-contract top-k search ordered by ascending distance
/// - Rejecting vectors whose length differs from `dimension` before any
///   state changes
pub trait VectorIndex: Send + Sync {
    /// Fixed vector dimension.
    fn dimension(&self) -> usize;

    /// Number of entries currently visible to a new search.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `vector` under `id`. Ids need not be unique.
    fn add_item(&self, id: u64, vector: &[f32]) -> IndexResult<()>;

    /// Return the `min(k, len)` entries closest to `query`.
    ///
    /// Results are ordered by ascending distance.
    fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<SearchResult>>;

    /// Get statistics about the index.
    fn stats(&self) -> IndexStats {
        IndexStats {
            dimension: self.dimension(),
            vectors: self.len(),
        }
    }
}
