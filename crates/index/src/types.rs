//! Index type definitions.

use serde::{Deserialize, Serialize};

/// One stored item.
///
/// Ids are caller-supplied labels and are not required to be unique: several
/// entries may share an id (e.g. multiple vector shards of one document).
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: u64,
    vector: Box<[f32]>,
}

impl Entry {
    pub(crate) fn new(id: u64, vector: &[f32]) -> Self {
        Self {
            id,
            vector: vector.into(),
        }
    }

    /// Caller-supplied identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stored embedding, exactly `dimension` values long.
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }
}

/// A single ranked match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Id of the matched entry
    pub id: u64,

    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Statistics about an index, reported by health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Configured vector dimension
    pub dimension: usize,

    /// Number of entries visible at the time of the call
    pub vectors: usize,
}
