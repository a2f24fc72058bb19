// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator-side bookkeeping of workers.

use std::collections::{BTreeMap, HashMap, VecDeque};

use dd_core::{Rank, StoredInfo, WorkerStatus};

/// An acknowledgment the coordinator is still owed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// A partition sent under a coordinator-side key
    Data { key: String },
    /// The result handle of a dispatched task
    Task,
}

/// What the coordinator knows about one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRecord {
    pub rank: Rank,
    pub status: WorkerStatus,
    handles: Vec<StoredInfo>,
    resident: HashMap<String, StoredInfo>,
    awaiting: VecDeque<Pending>,
    outputs_due: usize,
}

impl WorkerRecord {
    pub fn new(rank: Rank) -> Self {
        Self {
            rank,
            status: WorkerStatus::Listening,
            handles: Vec::new(),
            resident: HashMap::new(),
            awaiting: VecDeque::new(),
            outputs_due: 0,
        }
    }

    /// Handles the worker is known to hold, in acknowledgment order.
    pub fn handles(&self) -> &[StoredInfo] {
        &self.handles
    }

    pub fn holds(&self, identifier: &[u8]) -> bool {
        self.handles.iter().any(|h| h.identifier.as_bytes() == identifier)
    }

    /// Handle of the partition placed under `key`, once acknowledged.
    pub fn resident(&self, key: &str) -> Option<&StoredInfo> {
        self.resident.get(key)
    }

    /// Whether a partition under `key` is resident or already on its way.
    pub fn has_partition(&self, key: &str) -> bool {
        self.resident.contains_key(key)
            || self.awaiting.iter().any(|p| matches!(p, Pending::Data { key: k } if k == key))
    }

    pub fn awaiting(&self) -> impl Iterator<Item = &Pending> {
        self.awaiting.iter()
    }

    pub fn outputs_due(&self) -> usize {
        self.outputs_due
    }

    /// A task is outstanding until both its acknowledgment and its output
    /// have arrived.
    pub fn task_outstanding(&self) -> bool {
        self.outputs_due > 0 || self.awaiting.iter().any(|p| matches!(p, Pending::Task))
    }

    pub fn is_idle(&self) -> bool {
        self.awaiting.is_empty() && self.outputs_due == 0
    }

    pub(crate) fn expect_ack(&mut self, pending: Pending) {
        self.awaiting.push_back(pending);
    }

    pub(crate) fn expect_output(&mut self) {
        self.outputs_due += 1;
    }

    /// Match an incoming acknowledgment against the oldest one owed.
    /// `None` when the worker owes nothing.
    pub(crate) fn settle_ack(&mut self, handle: &StoredInfo) -> Option<Pending> {
        let pending = self.awaiting.pop_front()?;
        if let Pending::Data { key } = &pending {
            self.resident.insert(key.clone(), handle.clone());
        }
        if !self.handles.contains(handle) {
            self.handles.push(handle.clone());
        }
        Some(pending)
    }

    /// `false` when no output was owed.
    pub(crate) fn settle_output(&mut self) -> bool {
        if self.outputs_due == 0 {
            return false;
        }
        self.outputs_due -= 1;
        true
    }
}

/// Records for every worker rank of one communicator.
#[derive(Debug, Clone, Default)]
pub struct WorkerRegistry {
    workers: BTreeMap<Rank, WorkerRecord>,
}

impl WorkerRegistry {
    pub fn new(world_size: usize, coordinator: Rank) -> Self {
        let workers =
            Rank::workers(world_size, coordinator).map(|r| (r, WorkerRecord::new(r))).collect();
        Self { workers }
    }

    pub fn get(&self, rank: Rank) -> Option<&WorkerRecord> {
        self.workers.get(&rank)
    }

    pub(crate) fn get_mut(&mut self, rank: Rank) -> Option<&mut WorkerRecord> {
        self.workers.get_mut(&rank)
    }

    /// Records in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkerRecord> {
        self.workers.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut WorkerRecord> {
        self.workers.values_mut()
    }

    /// Ranks still accepting work.
    pub fn listening(&self) -> Vec<Rank> {
        self.iter().filter(|w| w.status.accepts_work()).map(|w| w.rank).collect()
    }

    /// Acknowledgments owed across all workers.
    pub fn acks_outstanding(&self) -> usize {
        self.iter().map(|w| w.awaiting.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
