//! Info command handler.
//!
//! Prints the effective configuration and the health of a fresh index.

use clap::Args;
use nexus_core::{config::AppConfig, AppResult};
use nexus_index::IndexService;

/// Show effective configuration and index health
#[derive(Args, Debug)]
pub struct InfoCommand {
    /// Seed the index before reporting health
    #[arg(long)]
    pub seeded: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InfoCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing info command");

        let service = IndexService::new(config.dimension)?;
        if self.seeded {
            service.seed_random(config.seed_count, None).await?;
        }
        let health = service.health();

        if self.json {
            let output = serde_json::json!({
                "status": "ok",
                "workspace": config.workspace,
                "configFile": config.config_path(),
                "dimension": config.dimension,
                "seedCount": config.seed_count,
                "defaultK": config.default_k,
                "stressRequests": config.stress_requests,
                "health": health,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Workspace:       {}", config.workspace.display());
            println!("Config file:     {}", config.config_path().display());
            println!("Dimension:       {}", config.dimension);
            println!("Seed count:      {}", config.seed_count);
            println!("Default k:       {}", config.default_k);
            println!("Stress requests: {}", config.stress_requests);
            println!(
                "Health:          ok ({} vectors, dimension {})",
                health.vectors, health.dimension
            );
        }

        Ok(())
    }
}
