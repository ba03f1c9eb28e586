//! In-process exact vector similarity index.
//!
//! Stores fixed-dimension `f32` embeddings keyed by a `u64` id and answers
//! k-nearest-neighbour queries by squared Euclidean distance. Appends are
//! serialized; searches run lock-free against a snapshot of the store and
//! may proceed on any number of threads at once.

mod arena;
pub mod distance;
pub mod error;
pub mod flat;
pub mod service;
pub mod store;
mod topk;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use error::{IndexError, IndexResult};
pub use flat::FlatIndex;
pub use service::IndexService;
pub use store::{Snapshot, VectorStore};
pub use types::{Entry, IndexStats, SearchResult};
pub use vector_index::VectorIndex;
