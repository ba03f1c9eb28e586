//! Property tests comparing `FlatIndex::search` against a full-sort oracle.

use crate::distance::squared_euclidean;
use crate::{FlatIndex, IndexError, SearchResult};
use proptest::prelude::*;

const DIM: usize = 3;

/// Small integer coordinates keep distances exact and produce plenty of ties.
fn coordinate() -> impl Strategy<Value = f32> {
    (-4i8..=4).prop_map(f32::from)
}

fn vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(coordinate(), DIM)
}

fn entries() -> impl Strategy<Value = Vec<(u64, Vec<f32>)>> {
    prop::collection::vec((0u64..16, vector()), 0..60)
}

/// Sort everything, then truncate.
fn oracle(entries: &[(u64, Vec<f32>)], query: &[f32], k: usize) -> Vec<SearchResult> {
    let mut scored: Vec<(f32, u64, usize)> = entries
        .iter()
        .enumerate()
        .map(|(position, (id, v))| (squared_euclidean(query, v), *id, position))
        .collect();
    scored.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });
    scored
        .into_iter()
        .take(k)
        .map(|(distance, id, _)| SearchResult { id, distance })
        .collect()
}

fn build(entries: &[(u64, Vec<f32>)]) -> FlatIndex {
    let index = FlatIndex::new(DIM).unwrap();
    for (id, v) in entries {
        index.add_item(*id, v).unwrap();
    }
    index
}

proptest! {
    #[test]
    fn search_matches_full_sort(entries in entries(), query in vector(), k in 0usize..80) {
        let index = build(&entries);
        let results = index.search(&query, k).unwrap();

        prop_assert_eq!(results.len(), k.min(entries.len()));
        prop_assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
        prop_assert_eq!(results, oracle(&entries, &query, k));
    }

    #[test]
    fn no_closer_entry_left_out(entries in entries(), query in vector(), k in 1usize..10) {
        let index = build(&entries);
        let results = index.search(&query, k).unwrap();

        if let Some(worst) = results.last() {
            let closer = entries
                .iter()
                .filter(|(_, v)| squared_euclidean(&query, v) < worst.distance)
                .count();
            prop_assert!(closer < results.len());
        }
    }

    #[test]
    fn self_match_has_zero_distance(entries in entries(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!entries.is_empty());
        let index = build(&entries);
        let (_, target) = &entries[pick.index(entries.len())];

        let best = index.search(target, 1).unwrap();
        prop_assert_eq!(best.len(), 1);
        prop_assert_eq!(best[0].distance, 0.0);
        prop_assert!(entries
            .iter()
            .any(|(id, v)| *id == best[0].id && v == target));
    }

    #[test]
    fn mismatched_vectors_never_stored(entries in entries(), bad in prop::collection::vec(coordinate(), 0..8)) {
        prop_assume!(bad.len() != DIM);
        let index = build(&entries);
        let before = index.len();

        prop_assert_eq!(
            index.add_item(1, &bad),
            Err(IndexError::DimensionMismatch { expected: DIM, actual: bad.len() })
        );
        prop_assert!(index.search(&bad, 1).is_err());
        prop_assert_eq!(index.len(), before);
    }

    #[test]
    fn appends_preserve_existing_entries(entries in entries(), extra in vector()) {
        let index = build(&entries);
        let before: Vec<_> = index.snapshot().iter().cloned().collect();

        index.add_item(99, &extra).unwrap();

        let after = index.snapshot();
        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert!(before.iter().zip(after.iter()).all(|(a, b)| a == b));
        prop_assert_eq!(after.get(before.len()).map(|e| e.id()), Some(99));
    }
}
