// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dd_channel::ChannelError;
use dd_core::{MessageKind, Rank};
use dd_wire::WireError;
use thiserror::Error;

use crate::distribute::SendError;

/// Why a coordinator session stopped. Every variant except `Aborted`
/// names the worker rank and message kind involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("malformed {kind} from rank {rank}: {source}")]
    Malformed {
        rank: Rank,
        kind: MessageKind,
        #[source]
        source: WireError,
    },

    #[error("protocol violation on {kind} with rank {rank}: {reason}")]
    Protocol { rank: Rank, kind: MessageKind, reason: String },

    #[error("transport failure on {kind} with rank {rank}: {source}")]
    Transport {
        rank: Rank,
        kind: MessageKind,
        #[source]
        source: ChannelError,
    },

    #[error("session aborted by an earlier error")]
    Aborted,
}

impl SessionError {
    pub(crate) fn protocol(rank: Rank, kind: MessageKind, reason: impl Into<String>) -> Self {
        SessionError::Protocol { rank, kind, reason: reason.into() }
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            SessionError::Malformed { rank, .. }
            | SessionError::Protocol { rank, .. }
            | SessionError::Transport { rank, .. } => Some(*rank),
            SessionError::Aborted => None,
        }
    }

    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            SessionError::Malformed { kind, .. }
            | SessionError::Protocol { kind, .. }
            | SessionError::Transport { kind, .. } => Some(*kind),
            SessionError::Aborted => None,
        }
    }
}

impl From<SendError> for SessionError {
    fn from(e: SendError) -> Self {
        SessionError::Transport { rank: e.rank, kind: e.kind, source: e.source }
    }
}
