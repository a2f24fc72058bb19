// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dd-worker: worker side of the dispatch protocol
//!
//! A [`Listener`] owns one endpoint and one [`Executor`]. It takes messages
//! only from the coordinator, answers stored data and finished tasks with
//! a DATA-ACK, sends task results and fetched objects as OUTPUT, and exits
//! on DETACH.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod executor;
pub mod lifecycle;
mod listener;
mod memory;

pub use error::{ExecError, WorkerError};
pub use executor::Executor;
pub use lifecycle::Lifecycle;
pub use listener::{Listener, LISTEN_KINDS};
pub use memory::{Kernel, MemoryExecutor};
