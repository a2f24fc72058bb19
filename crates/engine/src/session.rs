// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator session.
//!
//! A [`Session`] drives one logical computation against a pool of workers:
//! it places partitions, dispatches tasks, matches acknowledgments to what
//! each worker owes, and collects outputs. The first error aborts the
//! session; every later call except [`Session::teardown`] then fails with
//! [`SessionError::Aborted`].

use dd_channel::{Channel, Source};
use dd_core::{ByteText, MessageKind, Rank, StoredInfo, Task, WorkerStatus};
use dd_wire::{decode_handle, encode_task};

use crate::distribute::{Distributor, Payload};
use crate::error::SessionError;
use crate::registry::{Pending, WorkerRecord, WorkerRegistry};

/// A handle acknowledgment, attributed to its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub rank: Rank,
    pub handle: StoredInfo,
    /// What the acknowledgment settled
    pub pending: Pending,
}

/// One task input as the caller supplies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Already on the target worker
    Stored(StoredInfo),
    /// Sent to the target worker unless already resident under `key`
    Partition { key: String, bytes: Vec<u8> },
    /// Previously broadcast with [`Session::share`]
    Shared(String),
}

/// A task for one worker, before its inputs are resolved to handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub rank: Rank,
    pub mlir_code: ByteText,
    pub inputs: Vec<Input>,
}

impl Assignment {
    pub fn new(rank: Rank, mlir_code: impl Into<ByteText>, inputs: Vec<Input>) -> Self {
        Self { rank, mlir_code: mlir_code.into(), inputs }
    }
}

/// Result of one assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub rank: Rank,
    /// Handle of the result object, held by `rank`
    pub result: StoredInfo,
    pub output: Vec<u8>,
}

pub struct Session<C> {
    distributor: Distributor<C>,
    registry: WorkerRegistry,
    aborted: bool,
}

impl<C: Channel> Session<C> {
    pub fn new(channel: C, coordinator: Rank) -> Self {
        let registry = WorkerRegistry::new(channel.world_size(), coordinator);
        Self { distributor: Distributor::new(channel, coordinator), registry, aborted: false }
    }

    pub fn coordinator(&self) -> Rank {
        self.distributor.coordinator()
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn channel(&self) -> &C {
        self.distributor.channel()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Send a partition to `rank` under `key`. Returns `false` without
    /// sending when the partition is already resident or in flight.
    pub async fn place(
        &mut self,
        rank: Rank,
        key: &str,
        bytes: &[u8],
    ) -> Result<bool, SessionError> {
        self.live()?;
        let result = self.try_place(rank, key, bytes).await;
        self.settle(result)
    }

    /// Broadcast a partition to every worker under `key`. Returns `false`
    /// without sending when every worker already has it.
    pub async fn share(&mut self, key: &str, bytes: &[u8]) -> Result<bool, SessionError> {
        self.live()?;
        let result = self.try_share(key, bytes).await;
        self.settle(result)
    }

    /// Send `task` to `rank`. The worker then owes one acknowledgment
    /// carrying the result handle and one OUTPUT.
    pub async fn dispatch(&mut self, rank: Rank, task: &Task) -> Result<(), SessionError> {
        self.live()?;
        let result = self.try_dispatch(rank, task).await;
        self.settle(result)
    }

    /// Receive the next acknowledgment from any worker. `None` when no
    /// worker owes one.
    pub async fn await_ack(&mut self) -> Result<Option<Ack>, SessionError> {
        self.live()?;
        let result = self.try_await_ack().await;
        self.settle(result)
    }

    /// Receive acknowledgments until no worker owes one.
    pub async fn await_acks(&mut self) -> Result<Vec<Ack>, SessionError> {
        self.live()?;
        let result = self.try_await_acks().await;
        self.settle(result)
    }

    /// Receive the OUTPUT of the task outstanding on `rank`.
    pub async fn collect_output(&mut self, rank: Rank) -> Result<Vec<u8>, SessionError> {
        self.live()?;
        let result = self.try_collect_output(rank).await;
        self.settle(result)
    }

    /// Ask `rank` for the contents of an object it holds.
    pub async fn fetch_object(
        &mut self,
        rank: Rank,
        identifier: &[u8],
    ) -> Result<Vec<u8>, SessionError> {
        self.live()?;
        let result = self.try_fetch_object(rank, identifier).await;
        self.settle(result)
    }

    /// Run one task per assignment: place partitions, wait for their
    /// acknowledgments, dispatch, then collect result handles and outputs.
    pub async fn compute(
        &mut self,
        assignments: Vec<Assignment>,
    ) -> Result<Vec<Outcome>, SessionError> {
        self.live()?;
        let result = self.try_compute(assignments).await;
        self.settle(result)
    }

    /// Send DETACH to every listening worker. Runs even on an aborted
    /// session; reports the first send failure after trying every worker.
    pub async fn teardown(&mut self) -> Result<(), SessionError> {
        let mut first_err = None;
        for rank in self.registry.listening() {
            if let Some(record) = self.registry.get(rank) {
                if !record.is_idle() {
                    tracing::warn!(
                        %rank,
                        outputs_due = record.outputs_due(),
                        "detaching worker with work outstanding"
                    );
                }
            }
            match self.distributor.detach(rank).await {
                Ok(()) => {
                    if let Some(record) = self.registry.get_mut(rank) {
                        record.status = WorkerStatus::Detached;
                    }
                    tracing::info!(%rank, "worker detached");
                }
                Err(e) => {
                    tracing::error!(%rank, error = %e, "detach failed");
                    first_err.get_or_insert(SessionError::from(e));
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn live(&self) -> Result<(), SessionError> {
        if self.aborted {
            return Err(SessionError::Aborted);
        }
        Ok(())
    }

    fn settle<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(e) = &result {
            if !self.aborted {
                tracing::error!(error = %e, rank = ?e.rank(), kind = ?e.kind(), "session aborted");
                self.aborted = true;
            }
        }
        result
    }

    /// Record for a worker that may be given work.
    fn listening_worker(
        &self,
        rank: Rank,
        kind: MessageKind,
    ) -> Result<&WorkerRecord, SessionError> {
        let record = self
            .registry
            .get(rank)
            .ok_or_else(|| SessionError::protocol(rank, kind, "rank is not a worker"))?;
        if !record.status.accepts_work() {
            return Err(SessionError::protocol(
                rank,
                kind,
                format!("worker is {}, not listening", record.status),
            ));
        }
        Ok(record)
    }

    fn record_mut(
        &mut self,
        rank: Rank,
        kind: MessageKind,
    ) -> Result<&mut WorkerRecord, SessionError> {
        self.registry
            .get_mut(rank)
            .ok_or_else(|| SessionError::protocol(rank, kind, "rank is not a worker"))
    }

    async fn try_place(
        &mut self,
        rank: Rank,
        key: &str,
        bytes: &[u8],
    ) -> Result<bool, SessionError> {
        if self.listening_worker(rank, MessageKind::DataSize)?.has_partition(key) {
            tracing::debug!(%rank, key, "partition already placed");
            return Ok(false);
        }
        self.distributor.distribute(Payload::Data, bytes, rank).await?;
        let record = self.record_mut(rank, MessageKind::Data)?;
        record.expect_ack(Pending::Data { key: key.to_string() });
        Ok(true)
    }

    async fn try_share(&mut self, key: &str, bytes: &[u8]) -> Result<bool, SessionError> {
        // The collective needs every worker's receive loop.
        for record in self.registry.iter() {
            if !record.status.accepts_work() {
                return Err(SessionError::protocol(
                    record.rank,
                    MessageKind::Broadcast,
                    format!("worker is {}, cannot join a broadcast", record.status),
                ));
            }
        }
        if self.registry.iter().all(|w| w.has_partition(key)) {
            tracing::debug!(key, "shared partition already placed");
            return Ok(false);
        }
        self.distributor.send_to_all(bytes).await?;
        for record in self.registry.iter_mut() {
            record.expect_ack(Pending::Data { key: key.to_string() });
        }
        tracing::info!(key, len = bytes.len(), workers = self.registry.len(), "partition shared");
        Ok(true)
    }

    async fn try_dispatch(&mut self, rank: Rank, task: &Task) -> Result<(), SessionError> {
        if self.listening_worker(rank, MessageKind::TaskSize)?.task_outstanding() {
            return Err(SessionError::protocol(
                rank,
                MessageKind::TaskSize,
                "worker already has a task outstanding",
            ));
        }
        let bytes = encode_task(task);
        self.distributor.distribute(Payload::Task, &bytes, rank).await?;
        let record = self.record_mut(rank, MessageKind::Task)?;
        record.expect_ack(Pending::Task);
        record.expect_output();
        tracing::info!(%rank, inputs = task.inputs.len(), len = bytes.len(), "task dispatched");
        Ok(())
    }

    async fn try_await_ack(&mut self) -> Result<Option<Ack>, SessionError> {
        if self.registry.acks_outstanding() == 0 {
            return Ok(None);
        }
        let message = self
            .distributor
            .channel()
            .probe_and_receive(MessageKind::DataAck, Source::Any)
            .await
            .map_err(|source| SessionError::Transport {
                rank: self.coordinator(),
                kind: MessageKind::DataAck,
                source,
            })?;
        let rank = message.source;
        let owes_none = || {
            SessionError::protocol(
                rank,
                MessageKind::DataAck,
                "acknowledgment from a worker that owes none",
            )
        };
        let record = self.registry.get_mut(rank).ok_or_else(|| {
            SessionError::protocol(
                rank,
                MessageKind::DataAck,
                "acknowledgment from a rank that is not a worker",
            )
        })?;
        if record.awaiting().next().is_none() {
            return Err(owes_none());
        }
        let handle = decode_handle(&message.payload).map_err(|source| SessionError::Malformed {
            rank,
            kind: MessageKind::DataAck,
            source,
        })?;
        let pending = record.settle_ack(&handle).ok_or_else(owes_none)?;
        tracing::debug!(%rank, %handle, ?pending, "acknowledged");
        Ok(Some(Ack { rank, handle, pending }))
    }

    async fn try_await_acks(&mut self) -> Result<Vec<Ack>, SessionError> {
        let mut acks = Vec::with_capacity(self.registry.acks_outstanding());
        while let Some(ack) = self.try_await_ack().await? {
            acks.push(ack);
        }
        Ok(acks)
    }

    async fn try_collect_output(&mut self, rank: Rank) -> Result<Vec<u8>, SessionError> {
        if self.record_mut(rank, MessageKind::Output)?.outputs_due() == 0 {
            return Err(SessionError::protocol(rank, MessageKind::Output, "no task outstanding"));
        }
        let message = self
            .distributor
            .channel()
            .probe_and_receive(MessageKind::Output, Source::Rank(rank))
            .await
            .map_err(|source| SessionError::Transport {
                rank,
                kind: MessageKind::Output,
                source,
            })?;
        self.record_mut(rank, MessageKind::Output)?.settle_output();
        tracing::debug!(%rank, len = message.payload.len(), "output collected");
        Ok(message.payload)
    }

    async fn try_fetch_object(
        &mut self,
        rank: Rank,
        identifier: &[u8],
    ) -> Result<Vec<u8>, SessionError> {
        let identifier = ByteText::from(identifier);
        let record = self.listening_worker(rank, MessageKind::ObjectIdSize)?;
        if record.task_outstanding() {
            return Err(SessionError::protocol(
                rank,
                MessageKind::ObjectIdSize,
                "object requested while a task is outstanding",
            ));
        }
        if !record.holds(&identifier) {
            return Err(SessionError::protocol(
                rank,
                MessageKind::ObjectIdSize,
                format!("worker holds no object '{identifier}'"),
            ));
        }
        self.distributor.request_object(&identifier, rank).await?;
        let message = self
            .distributor
            .channel()
            .probe_and_receive(MessageKind::Output, Source::Rank(rank))
            .await
            .map_err(|source| SessionError::Transport {
                rank,
                kind: MessageKind::Output,
                source,
            })?;
        tracing::debug!(%rank, %identifier, len = message.payload.len(), "object fetched");
        Ok(message.payload)
    }

    async fn try_compute(
        &mut self,
        assignments: Vec<Assignment>,
    ) -> Result<Vec<Outcome>, SessionError> {
        // Validate everything before the first send.
        let mut seen = Vec::with_capacity(assignments.len());
        for a in &assignments {
            if seen.contains(&a.rank) {
                return Err(SessionError::protocol(
                    a.rank,
                    MessageKind::TaskSize,
                    "more than one task assigned to the worker",
                ));
            }
            seen.push(a.rank);
            if self.listening_worker(a.rank, MessageKind::TaskSize)?.task_outstanding() {
                return Err(SessionError::protocol(
                    a.rank,
                    MessageKind::TaskSize,
                    "worker already has a task outstanding",
                ));
            }
        }
        tracing::info!(tasks = assignments.len(), "computation started");

        for a in &assignments {
            for input in &a.inputs {
                if let Input::Partition { key, bytes } = input {
                    self.try_place(a.rank, key, bytes).await?;
                }
            }
        }
        self.try_await_acks().await?;

        let mut ranks = Vec::with_capacity(assignments.len());
        for a in assignments {
            let task = self.resolve(&a)?;
            self.try_dispatch(a.rank, &task).await?;
            ranks.push(a.rank);
        }

        let mut results = Vec::with_capacity(ranks.len());
        for ack in self.try_await_acks().await? {
            if ack.pending == Pending::Task {
                results.push((ack.rank, ack.handle));
            }
        }

        let mut outcomes = Vec::with_capacity(ranks.len());
        for rank in ranks {
            let output = self.try_collect_output(rank).await?;
            let Some(at) = results.iter().position(|(r, _)| *r == rank) else {
                return Err(SessionError::protocol(
                    rank,
                    MessageKind::DataAck,
                    "no result handle received",
                ));
            };
            let (_, result) = results.swap_remove(at);
            outcomes.push(Outcome { rank, result, output });
        }
        tracing::info!(tasks = outcomes.len(), "computation finished");
        Ok(outcomes)
    }

    /// Bind each input of `a` to a handle the target worker holds.
    fn resolve(&self, a: &Assignment) -> Result<Task, SessionError> {
        let record = self.listening_worker(a.rank, MessageKind::Task)?;
        let mut inputs = Vec::with_capacity(a.inputs.len());
        for input in &a.inputs {
            let handle = match input {
                Input::Stored(handle) => handle.clone(),
                Input::Partition { key, .. } | Input::Shared(key) => {
                    record.resident(key).cloned().ok_or_else(|| {
                        SessionError::protocol(
                            a.rank,
                            MessageKind::Task,
                            format!("partition '{key}' is not resident"),
                        )
                    })?
                }
            };
            inputs.push(handle);
        }
        Ok(Task::new(a.mlir_code.clone(), inputs))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
