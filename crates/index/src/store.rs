//! Append-only vector storage with snapshot reads.

use crate::arena::AppendArena;
use crate::error::{IndexError, IndexResult};
use crate::types::Entry;

/// Holds every accepted `(id, vector)` pair in insertion order.
///
/// The store only grows: entries are never removed or modified once added.
pub struct VectorStore {
    dimension: usize,
    entries: AppendArena<Entry>,
}

impl VectorStore {
    /// Create an empty store for vectors of `dimension` values.
    pub fn new(dimension: usize) -> IndexResult<Self> {
        if dimension == 0 {
            return Err(IndexError::InvalidDimension(dimension));
        }

        Ok(Self {
            dimension,
            entries: AppendArena::new(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of entries published so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an entry.
    ///
    /// The length is checked before anything is written, so a mismatched
    /// vector leaves the store untouched. Returns the entry's position.
    pub fn add_item(&self, id: u64, vector: &[f32]) -> IndexResult<usize> {
        IndexError::check_dimension(self.dimension, vector.len())?;

        let position = self.entries.push(Entry::new(id, vector));
        tracing::trace!(id, position, "Appended vector");
        Ok(position)
    }

    /// Fix the set of visible entries at the current published length.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            entries: &self.entries,
            len: self.entries.len(),
        }
    }
}

/// A consistent prefix of the store.
///
/// Entries appended after the snapshot was taken are invisible to it.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    entries: &'a AppendArena<Entry>,
    len: usize,
}

impl<'a> Snapshot<'a> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entry at `position`, if it lies inside the snapshot.
    pub fn get(&self, position: usize) -> Option<&'a Entry> {
        if position < self.len {
            self.entries.get(position)
        } else {
            None
        }
    }

    /// Iterate the visible entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Entry> + 'a {
        let entries = self.entries;
        (0..self.len).map(move |position| match entries.get(position) {
            Some(entry) => entry,
            // Every position below a published length has been written.
            None => panic!("published entry {position} is missing"),
        })
    }
}
