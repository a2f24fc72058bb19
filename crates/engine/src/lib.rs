// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dd-engine: coordinator side of the dispatch protocol
//!
//! - [`Distributor`] turns payloads into SIZE-then-payload sends or a
//!   notice-then-collective broadcast.
//! - [`Session`] drives one logical computation: places data, dispatches
//!   tasks, collects acknowledgments and outputs, detaches workers.
//! - [`WorkerRegistry`] is the session's bookkeeping of what each worker
//!   holds and owes.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod distribute;
pub mod env;
mod error;
pub mod registry;
pub mod session;

pub use config::{Config, ConfigError};
pub use distribute::{Distributor, Payload, SendError};
pub use error::SessionError;
pub use registry::{Pending, WorkerRecord, WorkerRegistry};
pub use session::{Ack, Assignment, Input, Outcome, Session};
