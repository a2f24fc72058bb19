// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker receive loop.
//!
//! The loop only ever probes for the first message of an exchange. The
//! rest of the exchange (the payload after a SIZE notice, the collective
//! after a BROADCAST notice) is received inline, so exchanges from the
//! coordinator are handled strictly one at a time.

use dd_channel::{Channel, Message, Source};
use dd_core::{MessageKind, Rank, WorkerStatus};
use dd_wire::{decode_object_id, decode_size, decode_task, encode_handle};

use crate::error::WorkerError;
use crate::executor::Executor;
use crate::lifecycle::Lifecycle;

/// Kinds that open an exchange.
pub const LISTEN_KINDS: [MessageKind; 5] = [
    MessageKind::Broadcast,
    MessageKind::DataSize,
    MessageKind::TaskSize,
    MessageKind::ObjectIdSize,
    MessageKind::Detach,
];

enum Flow {
    Continue,
    Exit,
}

pub struct Listener<C, E> {
    channel: C,
    executor: E,
    coordinator: Rank,
    lifecycle: Lifecycle,
}

impl<C: Channel, E: Executor> Listener<C, E> {
    pub fn new(channel: C, executor: E, coordinator: Rank) -> Self {
        Self { channel, executor, coordinator, lifecycle: Lifecycle::new() }
    }

    pub fn status(&self) -> WorkerStatus {
        self.lifecycle.status()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Handle exchanges until DETACH or the first error. The worker is
    /// terminated either way.
    pub async fn run(&mut self) -> Result<(), WorkerError> {
        let rank = self.channel.rank();
        tracing::info!(%rank, coordinator = %self.coordinator, "worker listening");
        let result = loop {
            match self.step().await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        if let Err(e) = &result {
            tracing::error!(%rank, error = %e, "worker loop failed");
        }
        self.lifecycle.terminate();
        result
    }

    /// Handle one exchange.
    async fn step(&mut self) -> Result<Flow, WorkerError> {
        let probe = self.channel.probe(Source::Rank(self.coordinator), &LISTEN_KINDS).await?;
        self.lifecycle.admit(probe.kind)?;
        let mut opening = Vec::with_capacity(probe.len);
        self.channel.receive(&probe, &mut opening).await?;

        match probe.kind {
            MessageKind::DataSize => {
                let declared = self.notice(MessageKind::DataSize, &opening)?;
                let data = self.payload(MessageKind::Data, declared).await?;
                let handle = self.executor.store(data)?;
                self.reply(MessageKind::DataAck, &encode_handle(&handle)).await?;
                tracing::debug!(%handle, "partition stored");
            }
            MessageKind::Broadcast => {
                let declared = self.notice(MessageKind::Broadcast, &opening)?;
                let mut buf = self.buffer(MessageKind::Broadcast, declared)?;
                self.channel.broadcast(self.coordinator, &mut buf).await?;
                let handle = self.executor.store(buf)?;
                self.reply(MessageKind::DataAck, &encode_handle(&handle)).await?;
                tracing::debug!(%handle, "shared partition stored");
            }
            MessageKind::TaskSize => {
                let declared = self.notice(MessageKind::TaskSize, &opening)?;
                let bytes = self.payload(MessageKind::Task, declared).await?;
                let task = decode_task(&bytes)
                    .map_err(|source| WorkerError::Malformed { kind: MessageKind::Task, source })?;
                let (handle, output) = self.executor.execute(&task)?;
                self.reply(MessageKind::DataAck, &encode_handle(&handle)).await?;
                self.reply(MessageKind::Output, &output).await?;
                tracing::debug!(%handle, inputs = task.inputs.len(), "task executed");
            }
            MessageKind::ObjectIdSize => {
                let declared = self.notice(MessageKind::ObjectIdSize, &opening)?;
                let bytes = self.payload(MessageKind::ObjectId, declared).await?;
                let identifier = decode_object_id(&bytes);
                let output = self.executor.fetch(&identifier)?;
                self.reply(MessageKind::Output, &output).await?;
                tracing::debug!(identifier = %identifier, "object sent");
            }
            MessageKind::Detach => {
                self.lifecycle.detach()?;
                return Ok(Flow::Exit);
            }
            kind => {
                return Err(WorkerError::Protocol {
                    kind,
                    reason: "does not open an exchange".to_string(),
                })
            }
        }
        Ok(Flow::Continue)
    }

    fn notice(&self, kind: MessageKind, body: &[u8]) -> Result<u64, WorkerError> {
        decode_size(body).map_err(|source| WorkerError::Malformed { kind, source })
    }

    /// Zeroed buffer for a collective of `declared` bytes.
    fn buffer(&self, kind: MessageKind, declared: u64) -> Result<Vec<u8>, WorkerError> {
        let too_large = || WorkerError::NoticeTooLarge { kind, declared };
        let len = usize::try_from(declared).map_err(|_| too_large())?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| too_large())?;
        buf.resize(len, 0);
        Ok(buf)
    }

    /// Receive the payload announced by a SIZE notice of `declared` bytes.
    async fn payload(&self, kind: MessageKind, declared: u64) -> Result<Vec<u8>, WorkerError> {
        let Message { payload, .. } =
            self.channel.probe_and_receive(kind, Source::Rank(self.coordinator)).await?;
        if payload.len() as u64 != declared {
            return Err(WorkerError::LengthMismatch { kind, declared, actual: payload.len() });
        }
        Ok(payload)
    }

    async fn reply(&self, kind: MessageKind, bytes: &[u8]) -> Result<(), WorkerError> {
        self.channel.send(self.coordinator, kind, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
