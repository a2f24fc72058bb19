// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distribution engine.
//!
//! Targeted payloads go out as a SIZE notice followed by the payload, both
//! to the same worker, always in that order. Shared payloads go out as one
//! BROADCAST notice per worker followed by a single collective transfer.
//! Anything addressed to the coordinator itself is dropped.

use dd_channel::{Channel, ChannelError};
use dd_core::{MessageKind, Rank};
use dd_wire::{encode_object_id, encode_size};
use thiserror::Error;

/// Payload classes that travel as SIZE-then-payload pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Data,
    Task,
}

impl Payload {
    /// `(size tag, payload tag)` for this payload class.
    pub fn tags(self) -> (MessageKind, MessageKind) {
        match self {
            Payload::Data => (MessageKind::DataSize, MessageKind::Data),
            Payload::Task => (MessageKind::TaskSize, MessageKind::Task),
        }
    }
}

/// A send that the substrate refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sending {kind} to rank {rank}: {source}")]
pub struct SendError {
    pub rank: Rank,
    pub kind: MessageKind,
    #[source]
    pub source: ChannelError,
}

/// Sends payloads from the coordinator to workers.
pub struct Distributor<C> {
    channel: C,
    coordinator: Rank,
}

impl<C: Channel> Distributor<C> {
    pub fn new(channel: C, coordinator: Rank) -> Self {
        Self { channel, coordinator }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn coordinator(&self) -> Rank {
        self.coordinator
    }

    /// Every rank in the communicator except the coordinator.
    pub fn workers(&self) -> impl Iterator<Item = Rank> {
        Rank::workers(self.channel.world_size(), self.coordinator)
    }

    /// Send `bytes` to `target` as a SIZE notice followed by the payload.
    pub async fn distribute(
        &self,
        payload: Payload,
        bytes: &[u8],
        target: Rank,
    ) -> Result<(), SendError> {
        if target == self.coordinator {
            tracing::trace!(?payload, "skipping distribution to the coordinator");
            return Ok(());
        }
        let (size_kind, payload_kind) = payload.tags();
        self.send(target, size_kind, &encode_size(bytes.len())).await?;
        self.send(target, payload_kind, bytes).await?;
        tracing::debug!(rank = %target, kind = %payload_kind, len = bytes.len(), "distributed");
        Ok(())
    }

    /// Send `bytes` to every worker: one BROADCAST notice each, then one
    /// collective transfer rooted at the coordinator.
    pub async fn send_to_all(&self, bytes: &[u8]) -> Result<(), SendError> {
        let notice = encode_size(bytes.len());
        let mut notified = 0usize;
        for rank in self.workers() {
            self.send(rank, MessageKind::Broadcast, &notice).await?;
            notified += 1;
        }
        let mut buf = bytes.to_vec();
        self.channel.broadcast(self.coordinator, &mut buf).await.map_err(|source| SendError {
            rank: self.coordinator,
            kind: MessageKind::Broadcast,
            source,
        })?;
        tracing::debug!(workers = notified, len = bytes.len(), "broadcast");
        Ok(())
    }

    /// Ask `target` to send back the object named `identifier` as OUTPUT.
    pub async fn request_object(&self, identifier: &[u8], target: Rank) -> Result<(), SendError> {
        if target == self.coordinator {
            return Ok(());
        }
        let body = encode_object_id(identifier);
        self.send(target, MessageKind::ObjectIdSize, &encode_size(body.len())).await?;
        self.send(target, MessageKind::ObjectId, &body).await
    }

    /// Tell `target` to stop accepting work.
    pub async fn detach(&self, target: Rank) -> Result<(), SendError> {
        if target == self.coordinator {
            return Ok(());
        }
        self.send(target, MessageKind::Detach, &[]).await
    }

    async fn send(&self, rank: Rank, kind: MessageKind, bytes: &[u8]) -> Result<(), SendError> {
        self.channel.send(rank, kind, bytes).await.map_err(|source| SendError { rank, kind, source })
    }
}

#[cfg(test)]
#[path = "distribute_tests.rs"]
mod tests;
