// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the protocol specs.

use std::sync::Arc;

use dd_channel::{Channel, LocalEndpoint, LocalFabric};
use dd_core::{Rank, StoredInfo, Task, WorkerStatus, COORDINATOR};
use dd_engine::Session;
use dd_worker::{ExecError, Executor, Listener, WorkerError};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

pub use dd_core::MessageKind;

/// Everything a fixture worker saw.
#[derive(Debug, Default)]
pub struct Journal {
    pub stored: Vec<Vec<u8>>,
    pub executed: Vec<Task>,
}

/// Executor with canned answers that journals its calls.
pub struct FixtureExecutor {
    journal: Arc<Mutex<Journal>>,
    result: StoredInfo,
    output: Vec<u8>,
}

impl FixtureExecutor {
    pub fn new(result: StoredInfo, output: &[u8]) -> (Self, Arc<Mutex<Journal>>) {
        let journal = Arc::new(Mutex::new(Journal::default()));
        (Self { journal: Arc::clone(&journal), result, output: output.to_vec() }, journal)
    }
}

impl Executor for FixtureExecutor {
    fn store(&mut self, bytes: Vec<u8>) -> Result<StoredInfo, ExecError> {
        let mut journal = self.journal.lock();
        journal.stored.push(bytes);
        Ok(StoredInfo::new(format!("stored-{}", journal.stored.len()), 0, 0))
    }

    fn execute(&mut self, task: &Task) -> Result<(StoredInfo, Vec<u8>), ExecError> {
        self.journal.lock().executed.push(task.clone());
        Ok((self.result.clone(), self.output.clone()))
    }

    fn fetch(&self, identifier: &[u8]) -> Result<Vec<u8>, ExecError> {
        if identifier == self.result.identifier.as_bytes() {
            Ok(self.output.clone())
        } else {
            Err(ExecError::UnknownObject(identifier.into()))
        }
    }
}

pub struct Worker {
    pub rank: Rank,
    pub journal: Arc<Mutex<Journal>>,
    pub handle: JoinHandle<(WorkerStatus, Result<(), WorkerError>)>,
}

impl Worker {
    /// Wait for the receive loop to exit.
    pub async fn join(self) -> (WorkerStatus, Result<(), WorkerError>) {
        self.handle.await.unwrap()
    }
}

/// A coordinator session at rank 0 plus `workers` fixture workers that
/// answer every task with `result` and `output`.
pub struct Cluster {
    pub fabric: LocalFabric,
    pub session: Session<LocalEndpoint>,
    pub workers: Vec<Worker>,
}

impl Cluster {
    pub fn start(workers: usize, result: StoredInfo, output: &[u8]) -> Self {
        let fabric = LocalFabric::new(workers + 1);
        let mut endpoints = fabric.endpoints().into_iter();
        let coordinator = endpoints.next().unwrap();
        let workers = endpoints
            .map(|endpoint| {
                let rank = endpoint.rank();
                let (executor, journal) = FixtureExecutor::new(result.clone(), output);
                let handle = tokio::spawn(async move {
                    let mut listener = Listener::new(endpoint, executor, COORDINATOR);
                    let result = listener.run().await;
                    (listener.status(), result)
                });
                Worker { rank, journal, handle }
            })
            .collect();
        Self { fabric, session: Session::new(coordinator, COORDINATOR), workers }
    }

    pub fn worker(&self, rank: Rank) -> &Worker {
        self.workers.iter().find(|w| w.rank == rank).unwrap()
    }
}
