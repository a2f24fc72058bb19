// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use dd_core::{DisplayData, Rank, StoredInfo, Structure};
use dd_engine::Outcome;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One worker's result, ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub rank: Rank,
    pub handle: StoredInfo,
    /// Rendered result, or why it could not be decoded
    pub rendered: String,
}

impl ResultRow {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let rendered = match Structure::from_bytes(&outcome.output) {
            Ok(structure) => structure.to_display_string(),
            Err(e) => format!("<{} undecodable bytes: {e}>", outcome.output.len()),
        };
        Self { rank: outcome.rank, handle: outcome.result.clone(), rendered }
    }
}

pub fn render(rows: &[ResultRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&format!(
                    "{} {}\n",
                    crate::color::header(&format!("rank {}", row.rank)),
                    crate::color::muted(&row.handle.to_string())
                ));
                for line in row.rendered.lines() {
                    out.push_str(&format!("  {line}\n"));
                }
            }
            Ok(out)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}
