//! Search command handler.
//!
//! Builds an index from random vectors and/or a JSONL file, then runs one
//! nearest-neighbour query against it.

use clap::Args;
use nexus_core::{config::AppConfig, AppError, AppResult};
use nexus_index::service::random_vector;
use nexus_index::IndexService;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Build an index and run a nearest-neighbour query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query vector as comma-separated floats (random when omitted)
    #[arg(short, long, allow_hyphen_values = true)]
    pub query: Option<String>,

    /// Number of neighbours to return (non-positive values return nothing)
    #[arg(short, long, allow_negative_numbers = true)]
    pub k: Option<i64>,

    /// Number of random vectors to seed the index with
    #[arg(long)]
    pub seed_count: Option<usize>,

    /// JSONL file of `{"id": .., "vector": [..]}` records to add
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Seed for the random generator (reproducible vectors)
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One line of an input file.
#[derive(Debug, Deserialize)]
struct InputRecord {
    id: u64,
    vector: Vec<f32>,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");
        tracing::debug!("Search options: {:?}", self);

        let service = IndexService::new(config.dimension)?;

        let seed_count = self.seed_count.unwrap_or(config.seed_count);
        if seed_count > 0 {
            service.seed_random(seed_count, self.rng_seed).await?;
        }

        if let Some(ref path) = self.input {
            let added = load_jsonl(&service, path).await?;
            tracing::info!("Added {} vectors from {:?}", added, path);
        }

        let query = match self.query {
            Some(ref raw) => parse_query(raw)?,
            None => random_vector(&mut rand::thread_rng(), config.dimension),
        };
        let k = self.k.unwrap_or(config.default_k as i64);

        let results = service.search(query, k).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else if results.is_empty() {
            println!("No results ({} vectors indexed)", service.health().vectors);
        } else {
            println!("{:>4}  {:>20}  {:>14}", "rank", "id", "distance");
            for (rank, result) in results.iter().enumerate() {
                println!("{:>4}  {:>20}  {:>14.6}", rank + 1, result.id, result.distance);
            }
        }

        Ok(())
    }
}

/// Parse a comma-separated list of floats.
fn parse_query(raw: &str) -> AppResult<Vec<f32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .map_err(|e| AppError::Config(format!("Invalid query component {:?}: {}", s, e)))
        })
        .collect()
}

/// Add every record of a JSONL file. Returns the number of vectors added.
async fn load_jsonl(service: &IndexService, path: &Path) -> AppResult<usize> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Config(format!("Failed to read input file {:?}: {}", path, e))
    })?;

    let mut added = 0;
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record: InputRecord = serde_json::from_str(line).map_err(|e| {
            AppError::Serialization(format!("{:?}:{}: {}", path, line_no + 1, e))
        })?;

        service
            .add_item(record.id, record.vector)
            .await
            .map_err(|e| AppError::Index(format!("{:?}:{}: {}", path, line_no + 1, e)))?;
        added += 1;
    }

    Ok(added)
}
