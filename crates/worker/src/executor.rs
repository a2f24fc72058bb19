// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dd_core::{StoredInfo, Task};

use crate::error::ExecError;

/// Execution collaborator: stores partitions and runs work plans.
///
/// Handles returned here are the only names the coordinator ever sees for
/// objects on this worker.
pub trait Executor: Send {
    /// Keep a partition and name it.
    fn store(&mut self, bytes: Vec<u8>) -> Result<StoredInfo, ExecError>;

    /// Run `task`, keep its result, and return the result's handle along
    /// with its bytes.
    fn execute(&mut self, task: &Task) -> Result<(StoredInfo, Vec<u8>), ExecError>;

    /// Bytes of a stored object.
    fn fetch(&self, identifier: &[u8]) -> Result<Vec<u8>, ExecError>;
}
