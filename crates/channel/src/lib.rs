// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message channel over a rank-addressed substrate.
//!
//! The [`Channel`] trait is all the dispatch layer knows about transport:
//! tagged point-to-point sends, a collective broadcast, and the two-phase
//! probe-then-receive idiom for variable-length messages.
//!
//! Ordering: two sends from the same sender to the same peer with the same
//! [`MessageKind`] arrive in send order. Nothing is promised across kinds.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod local;

pub use local::{LocalEndpoint, LocalFabric};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod recording;
#[cfg(any(test, feature = "test-support"))]
pub use recording::{Call, RecordingChannel};

use async_trait::async_trait;
use dd_core::{MessageKind, Rank};
use thiserror::Error;

/// Where a probe may take its message from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Any,
    Rank(Rank),
}

impl Source {
    pub fn matches(self, rank: Rank) -> bool {
        match self {
            Source::Any => true,
            Source::Rank(r) => r == rank,
        }
    }
}

/// A pending message found by [`Channel::probe`], not yet received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub source: Rank,
    pub kind: MessageKind,
    /// Exact payload length in bytes
    pub len: usize,
}

/// A received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub source: Rank,
    pub kind: MessageKind,
    pub payload: Vec<u8>,
}

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("peer {peer} is outside a communicator of {world_size}")]
    UnknownPeer { peer: Rank, world_size: usize },

    #[error("no pending {kind} message from {from} to receive")]
    NoPendingMessage { from: Rank, kind: MessageKind },

    #[error("broadcast from {root} carried {actual} bytes, receiver expected {expected}")]
    BroadcastLength { root: Rank, expected: usize, actual: usize },

    #[error("rank {root} did not supply a broadcast payload")]
    NoBroadcastPayload { root: Rank },

    #[error("channel closed")]
    Closed,
}

/// Rank-addressed message passing.
#[async_trait]
pub trait Channel: Send + Sync {
    /// This endpoint's own rank.
    fn rank(&self) -> Rank;

    /// Number of ranks in the communicator, coordinator included.
    fn world_size(&self) -> usize;

    /// Deliver `payload` to `peer` tagged with `kind`.
    async fn send(&self, peer: Rank, kind: MessageKind, payload: &[u8]) -> Result<(), ChannelError>;

    /// Collective one-to-all transfer. Every rank must call this with the
    /// same `root`; none returns before all have arrived. On `root`, `buf`
    /// is the data; elsewhere it must already be sized to the expected
    /// length and is overwritten with the root's bytes.
    async fn broadcast(&self, root: Rank, buf: &mut Vec<u8>) -> Result<(), ChannelError>;

    /// Block until a message of one of `kinds` from `source` is pending.
    async fn probe(&self, source: Source, kinds: &[MessageKind]) -> Result<Probe, ChannelError>;

    /// Receive the message `probe` found into `buf`, replacing its contents.
    async fn receive(&self, probe: &Probe, buf: &mut Vec<u8>) -> Result<(), ChannelError>;

    /// Probe for size, allocate, then receive.
    async fn probe_and_receive(
        &self,
        kind: MessageKind,
        source: Source,
    ) -> Result<Message, ChannelError> {
        let probe = self.probe(source, &[kind]).await?;
        let mut payload = Vec::with_capacity(probe.len);
        self.receive(&probe, &mut payload).await?;
        Ok(Message { source: probe.source, kind, payload })
    }
}
