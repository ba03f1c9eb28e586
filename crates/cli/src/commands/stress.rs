//! Stress command handler.
//!
//! Issues many searches at once through `IndexService` and reports whether
//! they actually ran in parallel. If searches were serialized, the sum of
//! per-request latencies would roughly equal the wall-clock time; with real
//! parallelism it is several times larger.

use clap::Args;
use futures::future::join_all;
use nexus_core::{config::AppConfig, AppResult};
use nexus_index::service::random_vector;
use nexus_index::IndexService;
use serde::Serialize;
use std::time::{Duration, Instant};

/// A concurrency factor above this counts as parallel execution.
const PASS_FACTOR: f64 = 1.5;

/// Fire concurrent searches and measure parallelism
#[derive(Args, Debug)]
pub struct StressCommand {
    /// Number of concurrent search requests
    #[arg(short, long)]
    pub requests: Option<usize>,

    /// Neighbours requested per search (non-positive values return nothing)
    #[arg(short, long, allow_negative_numbers = true)]
    pub k: Option<i64>,

    /// Number of random vectors to seed the index with
    #[arg(long)]
    pub seed_count: Option<usize>,

    /// Seed for the random generator
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a stress run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressReport {
    pub requests: usize,
    pub failed: usize,
    pub total_secs: f64,
    pub avg_latency_secs: f64,
    pub throughput: f64,
    pub sum_latency_secs: f64,
    pub concurrency_factor: f64,
    pub available_parallelism: usize,
    pub passed: bool,
}

impl StressCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stress command");
        tracing::debug!("Stress options: {:?}", self);

        let requests = self.requests.unwrap_or(config.stress_requests);
        let k = self.k.unwrap_or(config.default_k as i64);

        let service = IndexService::new(config.dimension)?;
        service
            .seed_random(self.seed_count.unwrap_or(config.seed_count), self.rng_seed)
            .await?;

        if !self.json {
            println!("Starting stress test with {} concurrent requests...", requests);
        }

        let start = Instant::now();
        let tasks: Vec<_> = (0..requests)
            .map(|request_id| {
                let service = service.clone();
                let query = random_vector(&mut rand::thread_rng(), service.dimension());
                tokio::spawn(async move {
                    let sent = Instant::now();
                    match service.search(query, k).await {
                        Ok(_) => Some(sent.elapsed()),
                        Err(e) => {
                            tracing::warn!("Request {} failed: {}", request_id, e);
                            None
                        }
                    }
                })
            })
            .collect();

        let mut latencies = Vec::with_capacity(requests);
        let mut failed = 0;
        for outcome in join_all(tasks).await {
            match outcome {
                Ok(Some(latency)) => latencies.push(latency),
                Ok(None) => failed += 1,
                Err(e) => {
                    tracing::warn!("Request task aborted: {}", e);
                    failed += 1;
                }
            }
        }
        let total = start.elapsed();

        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let Some(report) = summarize(&latencies, failed, total, parallelism) else {
            println!("All requests failed.");
            return Ok(());
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        Ok(())
    }
}

/// Aggregate per-request latencies. `None` when no request succeeded.
pub fn summarize(
    latencies: &[Duration],
    failed: usize,
    total: Duration,
    available_parallelism: usize,
) -> Option<StressReport> {
    if latencies.is_empty() {
        return None;
    }

    let total_secs = total.as_secs_f64();
    let sum_latency_secs: f64 = latencies.iter().map(Duration::as_secs_f64).sum();
    let completed = latencies.len() as f64;

    let (throughput, concurrency_factor) = if total_secs > 0.0 {
        (completed / total_secs, sum_latency_secs / total_secs)
    } else {
        (f64::INFINITY, 0.0)
    };

    Some(StressReport {
        requests: latencies.len(),
        failed,
        total_secs,
        avg_latency_secs: sum_latency_secs / completed,
        throughput,
        sum_latency_secs,
        concurrency_factor,
        available_parallelism,
        passed: concurrency_factor > PASS_FACTOR,
    })
}

fn print_report(report: &StressReport) {
    println!();
    println!("--- Results ---");
    println!("Total Requests: {}", report.requests);
    if report.failed > 0 {
        println!("Failed:         {}", report.failed);
    }
    println!("Total Time:     {:.4}s", report.total_secs);
    println!("Avg Latency:    {:.4}s", report.avg_latency_secs);
    println!("Throughput:     {:.2} req/s", report.throughput);
    println!();
    println!("Sum of Latencies:   {:.4}s", report.sum_latency_secs);
    println!("Concurrency Factor: {:.2}x", report.concurrency_factor);
    println!("Available Parallelism: {}", report.available_parallelism);
    println!();

    if report.passed {
        println!(
            "PASS: searches ran concurrently (factor > {:.1}x)",
            PASS_FACTOR
        );
    } else {
        println!("WARNING: low concurrency; searches may be too small to overlap");
    }
}
