//! Nexus CLI
//!
//! Main entry point for the nexus command-line tool.
//! Builds an in-memory vector index and runs queries or load tests against it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{InfoCommand, SearchCommand, StressCommand};
use nexus_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Nexus - exact in-process vector similarity search
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(about = "Exact in-process vector similarity search", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "NEXUS_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "NEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// Vector dimension of the index
    #[arg(short, long, global = true)]
    dimension: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an index and run a nearest-neighbour query
    Search(SearchCommand),

    /// Fire concurrent searches and measure parallelism
    Stress(StressCommand),

    /// Show effective configuration and index health
    Info(InfoCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Command-line paths decide which config file is merged
    let config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())?;

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.dimension,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::info!("Nexus CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Dimension: {}", config.dimension);

    let command_name = match &cli.command {
        Commands::Search(_) => "search",
        Commands::Stress(_) => "stress",
        Commands::Info(_) => "info",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Stress(cmd) => cmd.execute(&config).await,
        Commands::Info(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
