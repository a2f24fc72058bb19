// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle status, shared by the worker and the coordinator's records.

use serde::{Deserialize, Serialize};

/// Lifecycle of a worker process.
///
/// `Listening -> Detached -> Terminated`, or straight to `Terminated` when
/// the receive loop fails. There is no way back to `Listening`; a detached
/// worker rejoins only as a new process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Accepting tasks, data and object requests
    #[default]
    Listening,
    /// Told to stop taking work; still addressable
    Detached,
    /// Receive loop has exited
    Terminated,
}

impl WorkerStatus {
    pub fn accepts_work(self) -> bool {
        matches!(self, WorkerStatus::Listening)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkerStatus::Terminated)
    }

    /// Whether `self -> next` is a legal forward step.
    pub fn can_transition_to(self, next: WorkerStatus) -> bool {
        matches!(
            (self, next),
            (WorkerStatus::Listening, WorkerStatus::Detached | WorkerStatus::Terminated)
                | (WorkerStatus::Detached, WorkerStatus::Terminated)
        )
    }
}

crate::simple_display! {
    WorkerStatus {
        Listening => "listening",
        Detached => "detached",
        Terminated => "terminated",
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
