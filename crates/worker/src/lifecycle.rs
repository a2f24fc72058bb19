// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle state machine.
//!
//! Admission rules, by status:
//!
//! | status     | work kinds | DETACH  |
//! |------------|------------|---------|
//! | listening  | accepted   | accepted, becomes detached |
//! | detached   | rejected   | rejected |
//! | terminated | rejected   | rejected |
//!
//! Work kinds are BROADCAST, DATA-SIZE, DATA, TASK-SIZE, TASK,
//! OBJECT-ID-SIZE and OBJECT-ID. Every other kind flows worker to
//! coordinator and is never admitted.

use dd_core::{MessageKind, WorkerStatus};

use crate::error::WorkerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    status: WorkerStatus,
}

/// Whether the coordinator may send `kind` to a worker at all.
pub fn is_work(kind: MessageKind) -> bool {
    matches!(
        kind,
        MessageKind::Broadcast
            | MessageKind::DataSize
            | MessageKind::Data
            | MessageKind::TaskSize
            | MessageKind::Task
            | MessageKind::ObjectIdSize
            | MessageKind::ObjectId
    )
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> WorkerStatus {
        self.status
    }

    /// Check that a message of `kind` may be handled in the current status.
    pub fn admit(&self, kind: MessageKind) -> Result<(), WorkerError> {
        if kind != MessageKind::Detach && !is_work(kind) {
            return Err(WorkerError::Protocol {
                kind,
                reason: "not a coordinator-to-worker message".to_string(),
            });
        }
        if !self.status.accepts_work() {
            return Err(WorkerError::NotListening { status: self.status, kind });
        }
        Ok(())
    }

    /// Handle DETACH: stop accepting work.
    pub fn detach(&mut self) -> Result<(), WorkerError> {
        self.admit(MessageKind::Detach)?;
        self.advance(WorkerStatus::Detached);
        Ok(())
    }

    /// The receive loop has exited.
    pub fn terminate(&mut self) {
        if !self.status.is_terminal() {
            self.advance(WorkerStatus::Terminated);
        }
    }

    fn advance(&mut self, next: WorkerStatus) {
        debug_assert!(self.status.can_transition_to(next));
        tracing::info!(from = %self.status, to = %next, "worker status");
        self.status = next;
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
