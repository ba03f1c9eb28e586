//! Exact brute-force index.

use crate::distance::squared_euclidean;
use crate::error::{IndexError, IndexResult};
use crate::store::{Snapshot, VectorStore};
use crate::topk::{select_top_k, Candidate};
use crate::types::SearchResult;
use crate::vector_index::VectorIndex;

/// Exact nearest-neighbour index over squared Euclidean distance.
///
/// Any number of threads may search while one thread at a time appends.
/// A search scores every entry visible when it started and ignores the rest.
///
/// # Example
/// ```
/// use nexus_index::FlatIndex;
///
/// let index = FlatIndex::new(2).unwrap();
/// index.add_item(1, &[0.0, 0.0]).unwrap();
/// index.add_item(2, &[3.0, 4.0]).unwrap();
///
/// let results = index.search(&[0.0, 0.0], 1).unwrap();
/// assert_eq!(results[0].id, 1);
/// ```
pub struct FlatIndex {
    store: VectorStore,
}

impl FlatIndex {
    /// Create an empty index. Fails when `dimension` is zero.
    pub fn new(dimension: usize) -> IndexResult<Self> {
        let store = VectorStore::new(dimension)?;
        tracing::debug!(dimension, "Created flat index");
        Ok(Self { store })
    }

    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Append `vector` under `id`.
    pub fn add_item(&self, id: u64, vector: &[f32]) -> IndexResult<()> {
        self.store.add_item(id, vector).map(|_| ())
    }

    /// View of the entries visible right now.
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.store.snapshot()
    }

    /// Return the `min(k, n)` closest entries, `n` being the number of
    /// entries visible when the search starts.
    ///
    /// Equal distances are ordered by id, then by insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<SearchResult>> {
        IndexError::check_dimension(self.dimension(), query.len())?;

        let snapshot = self.store.snapshot();
        let keep = k.min(snapshot.len());
        if keep == 0 {
            tracing::trace!(k, visible = snapshot.len(), "Empty search");
            return Ok(Vec::new());
        }

        let candidates = snapshot
            .iter()
            .enumerate()
            .map(|(position, entry)| Candidate {
                distance: squared_euclidean(query, entry.vector()),
                id: entry.id(),
                position,
            });
        let results = select_top_k(candidates, keep);

        tracing::debug!(
            "Scanned {} vectors, returning {} results (requested top-{})",
            snapshot.len(),
            results.len(),
            k
        );

        Ok(results)
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        FlatIndex::dimension(self)
    }

    fn len(&self) -> usize {
        FlatIndex::len(self)
    }

    fn add_item(&self, id: u64, vector: &[f32]) -> IndexResult<()> {
        FlatIndex::add_item(self, id, vector)
    }

    fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<SearchResult>> {
        FlatIndex::search(self, query, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatIndex {
        let index = FlatIndex::new(2).unwrap();
        index.add_item(1, &[0.0, 0.0]).unwrap();
        index.add_item(2, &[3.0, 4.0]).unwrap();
        index.add_item(3, &[1.0, 1.0]).unwrap();
        index
    }

    #[test]
    fn test_concrete_scenario() {
        let results = sample_index().search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(
            results,
            vec![
                SearchResult {
                    id: 1,
                    distance: 0.0
                },
                SearchResult {
                    id: 3,
                    distance: 2.0
                },
            ]
        );
    }

    #[test]
    fn test_k_larger_than_store_returns_all_sorted() {
        let results = sample_index().search(&[0.0, 0.0], 10).unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(results[2].distance, 25.0);
    }

    #[test]
    fn test_k_zero_returns_empty() {
        assert!(sample_index().search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = FlatIndex::new(4).unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 2.0, 3.0, 4.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index = sample_index();
        assert_eq!(
            index.search(&[0.0, 0.0, 0.0], 1),
            Err(IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        // Rejected even when k is zero or the store is empty.
        assert!(index.search(&[0.0], 0).is_err());
        assert!(FlatIndex::new(2).unwrap().search(&[], 1).is_err());
    }

    #[test]
    fn test_self_match() {
        let index = sample_index();
        let results = index.search(&[3.0, 4.0], 1).unwrap();
        assert_eq!(results[0].id, 2);
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_duplicate_ids_both_returned() {
        let index = FlatIndex::new(1).unwrap();
        index.add_item(7, &[1.0]).unwrap();
        index.add_item(7, &[2.0]).unwrap();

        let results = index.search(&[0.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.id == 7));
        assert_eq!(results[0].distance, 1.0);
        assert_eq!(results[1].distance, 4.0);
    }

    #[test]
    fn test_equal_distances_ordered_by_id() {
        let index = FlatIndex::new(1).unwrap();
        index.add_item(30, &[1.0]).unwrap();
        index.add_item(10, &[-1.0]).unwrap();
        index.add_item(20, &[1.0]).unwrap();

        let results = index.search(&[0.0], 3).unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_infinite_inputs_rank_nan_distance_last() {
        let index = FlatIndex::new(1).unwrap();
        index.add_item(1, &[f32::INFINITY]).unwrap();
        index.add_item(2, &[5.0]).unwrap();
        index.add_item(3, &[0.0]).unwrap();

        // inf - inf is NaN; inf - finite is inf.
        let results = index.search(&[f32::INFINITY], 3).unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(results[0].distance, f32::INFINITY);
        assert!(results[2].distance.is_nan());

        let nearest = index.search(&[f32::INFINITY], 1).unwrap();
        assert_eq!(nearest[0].id, 2);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let index: Box<dyn VectorIndex> = Box::new(FlatIndex::new(2).unwrap());
        index.add_item(4, &[1.0, 0.0]).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.stats().dimension, 2);
        assert_eq!(index.stats().vectors, 1);
        assert_eq!(index.search(&[1.0, 0.0], 1).unwrap()[0].id, 4);
    }
}
