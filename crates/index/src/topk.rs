//! Top-k selection over scored entries.
//!
//! Results are ordered by distance ascending, then id ascending, then
//! insertion position ascending. Distances are compared by magnitude with
//! `f32::total_cmp`, so a NaN distance sorts after every other one whatever
//! its sign bit.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::SearchResult;

/// A scored entry awaiting selection.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub distance: f32,
    pub id: u64,
    pub position: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Arithmetic NaNs (e.g. `inf - inf`) may carry a set sign bit.
        self.distance
            .abs()
            .total_cmp(&other.distance.abs())
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Keep the `keep` smallest candidates and return them in ascending order.
///
/// Uses a bounded max-heap: O(n log keep) comparisons and O(keep) memory.
pub(crate) fn select_top_k<I>(candidates: I, keep: usize) -> Vec<SearchResult>
where
    I: IntoIterator<Item = Candidate>,
{
    if keep == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(keep);
    for candidate in candidates {
        if heap.len() < keep {
            heap.push(candidate);
        } else if let Some(mut worst) = heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|c| SearchResult {
            id: c.id,
            distance: c.distance,
        })
        .collect()
}
