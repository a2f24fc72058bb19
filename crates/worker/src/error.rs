// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dd_channel::ChannelError;
use dd_core::{ByteText, MessageKind, StructureError, WorkerStatus};
use dd_wire::WireError;
use thiserror::Error;

/// Failures of the execution collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    #[error("no object '{0}' is stored here")]
    UnknownObject(ByteText),

    #[error("bad partition: {0}")]
    Structure(#[from] StructureError),

    #[error("kernel failed: {0}")]
    Kernel(String),
}

/// Why a worker refused a message or its receive loop stopped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkerError {
    #[error("worker is {status}, refusing {kind}")]
    NotListening { status: WorkerStatus, kind: MessageKind },

    #[error("protocol violation on {kind}: {reason}")]
    Protocol { kind: MessageKind, reason: String },

    #[error("{kind} notice declares {declared} bytes, more than can be allocated")]
    NoticeTooLarge { kind: MessageKind, declared: u64 },

    #[error("{kind} carried {actual} bytes after a notice of {declared}")]
    LengthMismatch { kind: MessageKind, declared: u64, actual: usize },

    #[error("malformed {kind}: {source}")]
    Malformed {
        kind: MessageKind,
        #[source]
        source: WireError,
    },

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("transport: {0}")]
    Channel(#[from] ChannelError),
}
