// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dd-core: shared domain types for the distributed dispatch protocol

pub mod macros;

pub mod handle;
pub mod id;
pub mod message;
pub mod rank;
pub mod status;
pub mod structure;
pub mod task;
pub mod text;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use handle::{HandleParseError, StoredInfo};
pub use id::ObjectId;
pub use message::{MessageKind, UnknownTag};
pub use rank::{Rank, COORDINATOR};
pub use status::WorkerStatus;
pub use structure::{DenseMatrix, DisplayData, Structure, StructureError};
#[cfg(any(test, feature = "test-support"))]
pub use task::TaskBuilder;
pub use task::Task;
pub use text::ByteText;
