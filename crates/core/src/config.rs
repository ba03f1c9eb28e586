//! Configuration management for Nexus.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config files (.nexus/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources take precedence over earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Embedding width of OpenAI `text-embedding-ada-002`.
pub const DEFAULT_DIMENSION: usize = 1536;

/// Number of random vectors loaded into a fresh index.
pub const DEFAULT_SEED_COUNT: usize = 1000;

/// Default number of neighbours returned by a query.
pub const DEFAULT_K: usize = 5;

/// Default number of concurrent requests issued by the stress run.
pub const DEFAULT_STRESS_REQUESTS: usize = 50;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .nexus/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Vector dimension of the index
    pub dimension: usize,

    /// Number of random vectors to seed the index with
    pub seed_count: usize,

    /// Number of neighbours returned when a command does not say otherwise
    pub default_k: usize,

    /// Concurrent requests issued by `nexus stress`
    pub stress_requests: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    index: Option<IndexSection>,
    stress: Option<StressSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexSection {
    dimension: Option<usize>,
    seed_count: Option<usize>,
    default_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StressSection {
    requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            dimension: DEFAULT_DIMENSION,
            seed_count: DEFAULT_SEED_COUNT,
            default_k: DEFAULT_K,
            stress_requests: DEFAULT_STRESS_REQUESTS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and the environment.
    ///
    /// Environment variables:
    /// - `NEXUS_WORKSPACE`: Override workspace path
    /// - `NEXUS_CONFIG`: Path to config file
    /// - `NEXUS_DIMENSION`: Index dimension
    /// - `NEXUS_SEED_COUNT`: Number of seeded vectors
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use nexus_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Dimension: {}", config.dimension);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], but with workspace and config file paths
    /// given on the command line. These win over `NEXUS_WORKSPACE` and
    /// `NEXUS_CONFIG` and decide which YAML file is read.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("NEXUS_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("NEXUS_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config.config_path();
        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Some(dimension) = parse_env_usize("NEXUS_DIMENSION")? {
            config.dimension = dimension;
        }

        if let Some(seed_count) = parse_env_usize("NEXUS_SEED_COUNT")? {
            config.seed_count = seed_count;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Path of the YAML file this configuration reads from.
    pub fn config_path(&self) -> PathBuf {
        match self.config_file {
            Some(ref cf) => cf.clone(),
            None => self.nexus_dir().join("config.yaml"),
        }
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(index) = config_file.index {
            if let Some(dimension) = index.dimension {
                result.dimension = dimension;
            }
            if let Some(seed_count) = index.seed_count {
                result.seed_count = seed_count;
            }
            if let Some(default_k) = index.default_k {
                result.default_k = default_k;
            }
        }

        if let Some(requests) = config_file.stress.and_then(|s| s.requests) {
            result.stress_requests = requests;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        dimension: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(dimension) = dimension {
            self.dimension = dimension;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .nexus directory.
    pub fn nexus_dir(&self) -> PathBuf {
        self.workspace.join(".nexus")
    }

    /// Validate the numeric settings.
    pub fn validate(&self) -> AppResult<()> {
        if self.dimension == 0 {
            return Err(AppError::Config(
                "Index dimension must be a positive integer".to_string(),
            ));
        }

        if self.default_k == 0 {
            return Err(AppError::Config(
                "defaultK must be a positive integer".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env_usize(name: &str) -> AppResult<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("Invalid value for {}: {:?} ({})", name, raw, e))),
        Err(_) => Ok(None),
    }
}
