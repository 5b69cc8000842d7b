//! Configuration - optional YAML file with output and default-metric settings
//!
//! ```yaml
//! output: json
//! log_level: debug
//! metrics:
//!   batch_size: 32
//! ```

use crate::facts::MetricsInput;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG: &str = ".mldebug/config.yml";
const STANDALONE_CONFIG: &str = "mldebug.yml";

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report format when `--format` is not given
    pub output: OutputFormat,
    /// Default log filter (RUST_LOG still wins)
    pub log_level: String,
    /// Metric defaults, overridden by any explicitly supplied metric
    pub metrics: MetricsInput,
    /// File the config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            log_level: "info".to_string(),
            metrics: MetricsInput::new(),
            source: None,
        }
    }
}

impl Config {
    /// Load config from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve configuration.
    /// Priority:
    /// 1. explicit path (must exist)
    /// 2. .mldebug/config.yml
    /// 3. mldebug.yml
    /// 4. built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::from_file(path);
        }

        for candidate in [PROJECT_CONFIG, STANDALONE_CONFIG] {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }
}
