// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted channel that records outgoing traffic.
//!
//! Sends and broadcasts are appended to a call log in order. Incoming
//! messages are scripted with [`RecordingChannel::push_incoming`]; a probe
//! that finds nothing fails with [`ChannelError::Closed`] instead of
//! blocking, so a test that under-scripts replies fails fast.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use dd_core::{MessageKind, Rank};
use parking_lot::Mutex;

use crate::{Channel, ChannelError, Message, Probe, Source};

/// Recorded outgoing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send { peer: Rank, kind: MessageKind, payload: Vec<u8> },
    Broadcast { root: Rank, payload: Vec<u8> },
}

#[derive(Default)]
struct RecordingState {
    calls: Vec<Call>,
    inbox: VecDeque<Message>,
}

/// Fake channel for testing
#[derive(Clone)]
pub struct RecordingChannel {
    rank: Rank,
    world_size: usize,
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingChannel {
    pub fn new(rank: Rank, world_size: usize) -> Self {
        Self { rank, world_size, inner: Arc::new(Mutex::new(RecordingState::default())) }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    /// Destination and kind of every recorded send, in order.
    pub fn sends(&self) -> Vec<(Rank, MessageKind)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Send { peer, kind, .. } => Some((*peer, *kind)),
                Call::Broadcast { .. } => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Queue a message as if `source` had sent it to this rank.
    pub fn push_incoming(&self, source: Rank, kind: MessageKind, payload: impl Into<Vec<u8>>) {
        self.inner.lock().inbox.push_back(Message { source, kind, payload: payload.into() });
    }

    /// Scripted messages not yet received.
    pub fn pending(&self) -> usize {
        self.inner.lock().inbox.len()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.world_size
    }

    async fn send(&self, peer: Rank, kind: MessageKind, payload: &[u8]) -> Result<(), ChannelError> {
        if peer.index() >= self.world_size {
            return Err(ChannelError::UnknownPeer { peer, world_size: self.world_size });
        }
        self.inner.lock().calls.push(Call::Send { peer, kind, payload: payload.to_vec() });
        Ok(())
    }

    async fn broadcast(&self, root: Rank, buf: &mut Vec<u8>) -> Result<(), ChannelError> {
        self.inner.lock().calls.push(Call::Broadcast { root, payload: buf.clone() });
        Ok(())
    }

    async fn probe(&self, source: Source, kinds: &[MessageKind]) -> Result<Probe, ChannelError> {
        self.inner
            .lock()
            .inbox
            .iter()
            .find(|m| source.matches(m.source) && kinds.contains(&m.kind))
            .map(|m| Probe { source: m.source, kind: m.kind, len: m.payload.len() })
            .ok_or(ChannelError::Closed)
    }

    async fn receive(&self, probe: &Probe, buf: &mut Vec<u8>) -> Result<(), ChannelError> {
        let mut state = self.inner.lock();
        let at = state
            .inbox
            .iter()
            .position(|m| m.source == probe.source && m.kind == probe.kind)
            .ok_or(ChannelError::NoPendingMessage { from: probe.source, kind: probe.kind })?;
        let message = state.inbox.remove(at).ok_or(ChannelError::Closed)?;
        *buf = message.payload;
        Ok(())
    }
}
