// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire codec for dispatch messages.
//!
//! Wire format: fixed-width u64 little-endian integers, raw byte tails.
//!
//! ```text
//! Task   ::= code_len:u64 num_inputs:u64 code[code_len] Input*num_inputs
//! Input  ::= id_len:u64 id[id_len] num_rows:u64 num_cols:u64
//! Handle ::= Input
//! Size   ::= len:u64
//! ```
//!
//! Every frame must be consumed exactly; short buffers and trailing bytes
//! both decode to a [`WireError`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod cursor;

pub use codec::{
    decode_handle, decode_object_id, decode_size, decode_task, encode_handle, encode_object_id,
    encode_size, encode_task, encoded_len, INPUT_FIXED_LEN, SIZE_LEN, TASK_HEADER_LEN,
};

use thiserror::Error;

/// Decode-time framing violation. Every variant means the sender and
/// receiver disagree about what was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("malformed message: {what} needs {needed} bytes at offset {offset}, {available} remain")]
    Truncated { what: &'static str, offset: usize, needed: u64, available: usize },

    #[error("malformed message: header declares {count} inputs but only {available} bytes remain")]
    InputCount { count: u64, available: usize },

    #[error("malformed message: {0} trailing bytes after frame")]
    TrailingBytes(usize),
}
