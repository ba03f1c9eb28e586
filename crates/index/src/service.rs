//! Async front end for embedding the index in a Tokio application.
//!
//! Searches are CPU-bound linear scans. Running them inline would stall the
//! async executor, so each call is moved onto Tokio's blocking pool where
//! many searches (and the single writer) make progress in parallel.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{IndexError, IndexResult};
use crate::flat::FlatIndex;
use crate::types::{IndexStats, SearchResult};

/// Cloneable, thread-safe handle to a shared `FlatIndex`.
#[derive(Clone)]
pub struct IndexService {
    index: Arc<FlatIndex>,
}

impl IndexService {
    /// Create a service over a new, empty index.
    pub fn new(dimension: usize) -> IndexResult<Self> {
        Ok(Self::from_index(Arc::new(FlatIndex::new(dimension)?)))
    }

    /// Wrap an existing index.
    pub fn from_index(index: Arc<FlatIndex>) -> Self {
        Self { index }
    }

    /// Shared index behind this service.
    pub fn index(&self) -> &Arc<FlatIndex> {
        &self.index
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// Append a vector on the blocking pool.
    pub async fn add_item(&self, id: u64, vector: Vec<f32>) -> IndexResult<()> {
        IndexError::check_dimension(self.dimension(), vector.len())?;

        let index = Arc::clone(&self.index);
        run_blocking(move || index.add_item(id, &vector)).await
    }

    /// Search on the blocking pool.
    ///
    /// `k` is signed to match callers that forward untrusted request sizes;
    /// any `k <= 0` yields an empty result rather than an error.
    pub async fn search(&self, query: Vec<f32>, k: i64) -> IndexResult<Vec<SearchResult>> {
        IndexError::check_dimension(self.dimension(), query.len())?;

        let k = match usize::try_from(k) {
            Ok(k) => k,
            Err(_) => {
                tracing::warn!(k, "Non-positive result size requested, returning no results");
                0
            }
        };

        let index = Arc::clone(&self.index);
        run_blocking(move || index.search(&query, k)).await
    }

    /// Append `count` uniformly random vectors with ids `0..count`.
    ///
    /// A fixed `rng_seed` makes the generated vectors reproducible.
    pub async fn seed_random(&self, count: usize, rng_seed: Option<u64>) -> IndexResult<()> {
        let index = Arc::clone(&self.index);
        let dimension = self.dimension();

        tracing::info!(count, dimension, "Seeding index with random vectors");
        run_blocking(move || {
            let mut rng = match rng_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for id in 0..count as u64 {
                let vector = random_vector(&mut rng, dimension);
                index.add_item(id, &vector)?;
            }
            Ok(())
        })
        .await?;

        tracing::info!(vectors = self.index.len(), "Index loaded");
        Ok(())
    }

    /// Current dimension and vector count.
    pub fn health(&self) -> IndexStats {
        IndexStats {
            dimension: self.index.dimension(),
            vectors: self.index.len(),
        }
    }
}

/// Uniform `[0, 1)` vector of the given length.
pub fn random_vector<R: Rng + ?Sized>(rng: &mut R, dimension: usize) -> Vec<f32> {
    (0..dimension).map(|_| rng.gen::<f32>()).collect()
}

async fn run_blocking<T, F>(task: F) -> IndexResult<T>
where
    F: FnOnce() -> IndexResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| IndexError::TaskFailed(e.to_string()))?
}
