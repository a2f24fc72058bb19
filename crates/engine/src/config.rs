// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file named
//! by `DD_CONFIG`, then `DD_COORDINATOR_RANK` / `DD_WORKERS`.
//!
//! ```toml
//! coordinator = 0
//! workers = 3
//! ```

use std::path::{Path, PathBuf};

use dd_core::{Rank, COORDINATOR};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var}={value:?} is not a valid value")]
    InvalidEnv { var: &'static str, value: String },

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("coordinator rank {coordinator} is outside a communicator of {world_size}")]
    CoordinatorOutOfRange { coordinator: Rank, world_size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rank of the coordinating process
    pub coordinator: Rank,
    /// Number of worker processes
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { coordinator: COORDINATOR, workers: 3 }
    }
}

impl Config {
    /// Communicator size: the workers plus the coordinator.
    pub fn world_size(&self) -> usize {
        self.workers + 1
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Defaults, then the `DD_CONFIG` file, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::config_path() {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };
        if let Some(rank) = env::coordinator_rank()? {
            config.coordinator = Rank(rank);
        }
        if let Some(workers) = env::workers()? {
            config.workers = workers;
        }
        config.validate()?;
        tracing::debug!(coordinator = %config.coordinator, workers = config.workers, "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.coordinator.index() >= self.world_size() {
            return Err(ConfigError::CoordinatorOutOfRange {
                coordinator: self.coordinator,
                world_size: self.world_size(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
