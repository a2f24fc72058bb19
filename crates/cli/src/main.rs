// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ddrun: run a column-sum computation over an in-process worker pool.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod demo;
mod exit_error;
mod kernel;
mod output;

use std::path::PathBuf;

use clap::Parser;
use dd_core::Rank;
use dd_engine::{env, Config};
use tracing_subscriber::EnvFilter;

use crate::exit_error::ExitError;
use crate::output::{OutputFormat, ResultRow};

#[derive(Parser, Debug)]
#[command(name = "ddrun", version, styles = color::styles())]
#[command(about = "Dispatch a column-sum computation to in-process workers")]
struct Cli {
    /// TOML config file (overrides DD_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of workers (overrides config and DD_WORKERS)
    #[arg(long)]
    workers: Option<usize>,

    /// Coordinator rank (overrides config and DD_COORDINATOR_RANK)
    #[arg(long)]
    coordinator: Option<u32>,

    /// Rows in each worker's partition
    #[arg(long, default_value_t = 4)]
    rows: usize,

    /// Columns in every partition
    #[arg(long, default_value_t = 4)]
    cols: usize,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl Cli {
    fn config(&self) -> Result<Config, ExitError> {
        let usage = |e: dd_engine::ConfigError| ExitError::new(exit_error::USAGE, e.to_string());
        let mut config = match &self.config {
            Some(path) => Config::load_file(path).map_err(usage)?,
            None => Config::load().map_err(usage)?,
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(rank) = self.coordinator {
            config.coordinator = Rank(rank);
        }
        config.validate().map_err(usage)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env::log_filter()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(e.code);
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let config = cli.config()?;
    let shape = demo::Shape { rows: cli.rows, cols: cli.cols };
    let outcomes = demo::run(&config, shape)
        .await
        .map_err(|e| ExitError::new(exit_error::FAILURE, format!("{e:#}")))?;

    let rows: Vec<ResultRow> = outcomes.iter().map(ResultRow::from_outcome).collect();
    let text = output::render(&rows, cli.format)
        .map_err(|e| ExitError::new(exit_error::FAILURE, e.to_string()))?;
    print!("{text}");
    Ok(())
}
