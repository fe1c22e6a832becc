//! Configuration management for the Graviton miner.
//!
//! Supports JSON config files; CLI flags override file values.

use anyhow::{Context, Result};
use graviton_kernel::KernelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Miner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Mining run parameters
    #[serde(default)]
    pub mining: MiningConfig,

    /// Kernel parameters (weights, matrix dimension, curvature floor)
    #[serde(default)]
    pub kernel: KernelConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Block header data prefixed to each nonce
    #[serde(default = "default_block")]
    pub block: String,

    /// Difficulty as a decimal string (arbitrary precision)
    #[serde(default = "default_difficulty")]
    pub difficulty: String,

    /// Nonce search limit
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,

    /// Network node count for the consciousness gate (1 = solo)
    #[serde(default = "default_n_nodes")]
    pub n_nodes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Quiet mode (warnings only)
    #[serde(default)]
    pub quiet: bool,

    /// Debug logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            block: default_block(),
            difficulty: default_difficulty(),
            max_attempts: default_max_attempts(),
            n_nodes: default_n_nodes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mining: MiningConfig::default(),
            kernel: KernelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;

        let config: Config = serde_json::from_str(&content)
            .context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path.as_ref(), json)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.mining.block.is_empty() {
            anyhow::bail!("Block data must not be empty");
        }

        if self.mining.max_attempts == 0 {
            anyhow::bail!("max_attempts must be at least 1");
        }

        if self.mining.difficulty.is_empty()
            || !self.mining.difficulty.bytes().all(|b| b.is_ascii_digit())
        {
            anyhow::bail!(
                "Difficulty must be a non-negative decimal integer, got '{}'",
                self.mining.difficulty
            );
        }

        if !(0.0..=1.0).contains(&self.kernel.qg_threshold) {
            anyhow::bail!(
                "qg_threshold must be in [0, 1], got {}",
                self.kernel.qg_threshold
            );
        }

        Ok(())
    }
}

// Default value functions

fn default_block() -> String {
    "genesis".to_string()
}

fn default_difficulty() -> String {
    "50000".to_string()
}

fn default_max_attempts() -> u64 {
    1_000_000
}

fn default_n_nodes() -> u64 {
    1
}
