// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message kinds.
//!
//! Every message on the substrate is tagged with exactly one [`MessageKind`].
//! Large payloads travel in two phases, each with its own kind: a SIZE
//! notice and then the payload. The numeric tags are part of the wire
//! contract and must not be renumbered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of message tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum MessageKind {
    /// Length notice preceding a collective broadcast
    Broadcast = 0,
    DataSize = 1,
    Data = 2,
    /// Worker reply carrying the handle of an object it stored or produced
    DataAck = 3,
    TaskSize = 4,
    Task = 5,
    InputKeys = 6,
    /// Result bytes of a task or a fetched object
    Output = 7,
    OutputKey = 8,
    Detach = 9,
    ObjectIdSize = 10,
    ObjectId = 11,
}

/// A tag value outside the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown message tag {0}")]
pub struct UnknownTag(pub u8);

impl MessageKind {
    pub const ALL: [MessageKind; 12] = [
        Self::Broadcast,
        Self::DataSize,
        Self::Data,
        Self::DataAck,
        Self::TaskSize,
        Self::Task,
        Self::InputKeys,
        Self::Output,
        Self::OutputKey,
        Self::Detach,
        Self::ObjectIdSize,
        Self::ObjectId,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether this kind carries only an 8-byte length notice.
    pub fn is_size_notice(self) -> bool {
        matches!(self, Self::Broadcast | Self::DataSize | Self::TaskSize | Self::ObjectIdSize)
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = UnknownTag;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(tag as usize).copied().ok_or(UnknownTag(tag))
    }
}

crate::simple_display! {
    MessageKind {
        Broadcast => "BROADCAST",
        DataSize => "DATA-SIZE",
        Data => "DATA",
        DataAck => "DATA-ACK",
        TaskSize => "TASK-SIZE",
        Task => "TASK",
        InputKeys => "INPUT-KEYS",
        Output => "OUTPUT",
        OutputKey => "OUTPUT-KEY",
        Detach => "DETACH",
        ObjectIdSize => "OBJECT-ID-SIZE",
        ObjectId => "OBJECT-ID",
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
