// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the coordinator.

use std::path::PathBuf;

use crate::config::ConfigError;

pub const COORDINATOR_RANK: &str = "DD_COORDINATOR_RANK";
pub const WORKERS: &str = "DD_WORKERS";
pub const CONFIG: &str = "DD_CONFIG";
pub const LOG: &str = "DD_LOG";

/// Coordinator rank override
pub fn coordinator_rank() -> Result<Option<u32>, ConfigError> {
    parsed(COORDINATOR_RANK)
}

/// Worker count override
pub fn workers() -> Result<Option<usize>, ConfigError> {
    parsed(WORKERS)
}

/// Path of a TOML config file, if one was given.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(CONFIG).ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Log filter directive (default `info`).
pub fn log_filter() -> String {
    std::env::var(LOG).ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

fn parsed<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        _ => Ok(None),
    }
}
