// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One coordinator and a pool of in-process workers running a column-sum
//! computation end to end.

use anyhow::Context;
use dd_channel::{Channel, LocalEndpoint, LocalFabric};
use dd_core::{DenseMatrix, Rank, Structure};
use dd_engine::{Assignment, Config, Input, Outcome, Session};
use dd_worker::{Listener, MemoryExecutor};
use tokio::task::JoinSet;

use crate::kernel::column_sums;

/// Shape of the data the demo generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

const SHARED_KEY: &str = "offsets";

/// Partition placed on `rank`: row `r`, column `c` holds `rank * 100 + r * cols + c`.
pub fn partition(rank: Rank, shape: Shape) -> anyhow::Result<Structure> {
    let base = f64::from(rank.get()) * 100.0;
    let values = (0..shape.rows * shape.cols).map(|i| base + i as f64).collect();
    DenseMatrix::from_rows(shape.rows, shape.cols, values)
        .map(Structure::DenseF64)
        .context("partition shape overflows")
}

/// A single row of ones, broadcast to every worker.
pub fn offsets(shape: Shape) -> anyhow::Result<Structure> {
    DenseMatrix::from_rows(1, shape.cols, vec![1.0; shape.cols])
        .map(Structure::DenseF64)
        .context("offsets shape overflows")
}

/// Run the demo and return one outcome per worker, in rank order.
pub async fn run(config: &Config, shape: Shape) -> anyhow::Result<Vec<Outcome>> {
    let fabric = LocalFabric::new(config.world_size());
    let coordinator = config.coordinator;

    let mut workers = JoinSet::new();
    for endpoint in fabric.endpoints() {
        if endpoint.rank() == coordinator {
            continue;
        }
        workers.spawn(async move {
            let rank = endpoint.rank();
            let executor = MemoryExecutor::new(column_sums);
            let mut listener = Listener::new(endpoint, executor, coordinator);
            listener.run().await.map(|()| rank)
        });
    }

    let endpoint: LocalEndpoint =
        fabric.endpoint(coordinator).context("coordinator rank outside the fabric")?;
    let mut session = Session::new(endpoint, coordinator);
    let result = compute(&mut session, shape).await;
    let teardown = session.teardown().await;
    if result.is_err() {
        fabric.close();
    }

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(rank)) => tracing::debug!(%rank, "worker finished"),
            Ok(Err(e)) => tracing::warn!(error = %e, "worker failed"),
            Err(e) => tracing::warn!(error = %e, "worker task panicked"),
        }
    }

    let outcomes = result?;
    teardown.context("detaching workers")?;
    Ok(outcomes)
}

async fn compute(
    session: &mut Session<LocalEndpoint>,
    shape: Shape,
) -> anyhow::Result<Vec<Outcome>> {
    session.share(SHARED_KEY, &offsets(shape)?.to_bytes()).await?;
    session.await_acks().await?;

    let mut assignments = Vec::new();
    for rank in session.registry().listening() {
        let part = Input::Partition {
            key: format!("part-{rank}"),
            bytes: partition(rank, shape)?.to_bytes(),
        };
        assignments.push(Assignment::new(
            rank,
            "colsum(part, offsets)",
            vec![part, Input::Shared(SHARED_KEY.to_string())],
        ));
    }
    let outcomes = session.compute(assignments).await?;
    tracing::info!(workers = outcomes.len(), "demo computation complete");
    Ok(outcomes)
}

#[cfg(test)]
#[path = "demo_tests.rs"]
mod tests;
