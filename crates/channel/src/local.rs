// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local substrate.
//!
//! Every rank gets a mailbox; a send appends to the peer's mailbox and wakes
//! its probes. Mailboxes are scanned front to back, so the first match for a
//! (source, kind) pair is always the oldest one, which preserves per-pair
//! send order. The collective broadcast is a two-phase rendezvous on a
//! barrier shared by all ranks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dd_core::{MessageKind, Rank};
use parking_lot::Mutex;
use tokio::sync::{Barrier, Notify};

use crate::{Channel, ChannelError, Probe, Source};

struct Parcel {
    source: Rank,
    kind: MessageKind,
    payload: Vec<u8>,
}

#[derive(Default)]
struct Mailbox {
    queue: Mutex<VecDeque<Parcel>>,
    arrived: Notify,
}

impl Mailbox {
    fn find(&self, source: Source, kinds: &[MessageKind]) -> Option<Probe> {
        self.queue
            .lock()
            .iter()
            .find(|p| source.matches(p.source) && kinds.contains(&p.kind))
            .map(|p| Probe { source: p.source, kind: p.kind, len: p.payload.len() })
    }

    fn take(&self, source: Rank, kind: MessageKind) -> Option<Parcel> {
        let mut queue = self.queue.lock();
        let at = queue.iter().position(|p| p.source == source && p.kind == kind)?;
        queue.remove(at)
    }
}

struct Shared {
    mailboxes: Vec<Mailbox>,
    barrier: Barrier,
    /// Root's payload for the broadcast in progress
    slot: Mutex<Option<Arc<Vec<u8>>>>,
    closed: AtomicBool,
    /// Wakes ranks parked on the barrier when the fabric closes
    closing: Notify,
}

/// An in-process communicator of `world_size` ranks.
#[derive(Clone)]
pub struct LocalFabric {
    shared: Arc<Shared>,
}

impl LocalFabric {
    pub fn new(world_size: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                mailboxes: (0..world_size).map(|_| Mailbox::default()).collect(),
                barrier: Barrier::new(world_size),
                slot: Mutex::new(None),
                closed: AtomicBool::new(false),
                closing: Notify::new(),
            }),
        }
    }

    pub fn world_size(&self) -> usize {
        self.shared.mailboxes.len()
    }

    /// Endpoint for `rank`, or `None` if it is outside the communicator.
    pub fn endpoint(&self, rank: Rank) -> Option<LocalEndpoint> {
        (rank.index() < self.world_size())
            .then(|| LocalEndpoint { rank, shared: Arc::clone(&self.shared) })
    }

    /// One endpoint per rank, in rank order.
    pub fn endpoints(&self) -> Vec<LocalEndpoint> {
        (0..self.world_size() as u32)
            .map(|r| LocalEndpoint { rank: Rank(r), shared: Arc::clone(&self.shared) })
            .collect()
    }

    /// Fail every pending and future probe and broadcast with
    /// [`ChannelError::Closed`]. A closed fabric cannot be reopened: ranks
    /// released from the barrier leave it out of step.
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        for mailbox in &self.shared.mailboxes {
            mailbox.arrived.notify_waiters();
        }
        self.shared.closing.notify_waiters();
    }
}

/// One rank's view of a [`LocalFabric`].
#[derive(Clone)]
pub struct LocalEndpoint {
    rank: Rank,
    shared: Arc<Shared>,
}

impl LocalEndpoint {
    fn mailbox(&self, rank: Rank) -> Result<&Mailbox, ChannelError> {
        self.shared
            .mailboxes
            .get(rank.index())
            .ok_or(ChannelError::UnknownPeer { peer: rank, world_size: self.shared.mailboxes.len() })
    }

    fn check_open(&self) -> Result<(), ChannelError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        Ok(())
    }

    /// Wait on the shared barrier unless the fabric closes first.
    async fn rendezvous(&self) -> Result<(), ChannelError> {
        let closing = self.shared.closing.notified();
        tokio::pin!(closing);
        closing.as_mut().enable();
        self.check_open()?;
        tokio::select! {
            _ = self.shared.barrier.wait() => Ok(()),
            _ = closing => Err(ChannelError::Closed),
        }
    }
}

#[async_trait]
impl Channel for LocalEndpoint {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.shared.mailboxes.len()
    }

    async fn send(&self, peer: Rank, kind: MessageKind, payload: &[u8]) -> Result<(), ChannelError> {
        self.check_open()?;
        let mailbox = self.mailbox(peer)?;
        tracing::trace!(from = %self.rank, to = %peer, %kind, len = payload.len(), "send");
        mailbox.queue.lock().push_back(Parcel { source: self.rank, kind, payload: payload.to_vec() });
        mailbox.arrived.notify_waiters();
        Ok(())
    }

    async fn broadcast(&self, root: Rank, buf: &mut Vec<u8>) -> Result<(), ChannelError> {
        self.check_open()?;
        self.mailbox(root)?;
        let is_root = self.rank == root;
        if is_root {
            *self.shared.slot.lock() = Some(Arc::new(buf.clone()));
        }

        // Phase 1: nobody reads until every rank has arrived.
        self.rendezvous().await?;
        let result = if is_root {
            Ok(())
        } else {
            let data = self.shared.slot.lock().clone();
            match data {
                Some(data) if data.len() == buf.len() => {
                    buf.copy_from_slice(&data);
                    Ok(())
                }
                Some(data) => Err(ChannelError::BroadcastLength {
                    root,
                    expected: buf.len(),
                    actual: data.len(),
                }),
                None => Err(ChannelError::NoBroadcastPayload { root }),
            }
        };

        // Phase 2: the root may not reuse the slot until every rank has read it.
        self.rendezvous().await?;
        if is_root {
            self.shared.slot.lock().take();
        }
        result
    }

    async fn probe(&self, source: Source, kinds: &[MessageKind]) -> Result<Probe, ChannelError> {
        let mailbox = self.mailbox(self.rank)?;
        loop {
            let arrived = mailbox.arrived.notified();
            tokio::pin!(arrived);
            // Register before checking so a send between the check and the
            // await still wakes us.
            arrived.as_mut().enable();

            self.check_open()?;
            if let Some(probe) = mailbox.find(source, kinds) {
                return Ok(probe);
            }
            arrived.await;
        }
    }

    async fn receive(&self, probe: &Probe, buf: &mut Vec<u8>) -> Result<(), ChannelError> {
        let parcel = self
            .mailbox(self.rank)?
            .take(probe.source, probe.kind)
            .ok_or(ChannelError::NoPendingMessage { from: probe.source, kind: probe.kind })?;
        buf.clear();
        buf.reserve_exact(probe.len);
        buf.extend_from_slice(&parcel.payload);
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
