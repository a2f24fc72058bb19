// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task, handle, and size-notice encoding.

use dd_core::{ByteText, StoredInfo, Task};

use crate::cursor::{Reader, Writer};
use crate::WireError;

/// Body length of a SIZE notice.
pub const SIZE_LEN: usize = 8;

/// `code_len` + `num_inputs`.
pub const TASK_HEADER_LEN: usize = 16;

/// Bytes of an encoded input besides its identifier: `id_len`, rows, cols.
pub const INPUT_FIXED_LEN: usize = 24;

/// Exact size of [`encode_task`]'s output.
pub fn encoded_len(task: &Task) -> usize {
    TASK_HEADER_LEN
        + task.mlir_code.len()
        + task.inputs.iter().map(|i| INPUT_FIXED_LEN + i.identifier.len()).sum::<usize>()
}

pub fn encode_task(task: &Task) -> Vec<u8> {
    let mut w = Writer::with_capacity(encoded_len(task));
    w.put_u64(task.mlir_code.len() as u64);
    w.put_u64(task.inputs.len() as u64);
    w.put_bytes(&task.mlir_code);
    for input in &task.inputs {
        put_handle(&mut w, input);
    }
    w.finish()
}

pub fn decode_task(bytes: &[u8]) -> Result<Task, WireError> {
    let mut r = Reader::new(bytes);
    let code_len = r.u64("code_len")?;
    let num_inputs = r.u64("num_inputs")?;
    let mlir_code = ByteText::from(r.take(code_len, "mlir_code")?);

    // Reject impossible counts before allocating for them.
    let available = r.remaining();
    let min_tail = num_inputs.checked_mul(INPUT_FIXED_LEN as u64);
    if !matches!(min_tail, Some(min) if min <= available as u64) {
        return Err(WireError::InputCount { count: num_inputs, available });
    }

    let mut inputs = Vec::with_capacity(num_inputs as usize);
    for _ in 0..num_inputs {
        inputs.push(read_handle(&mut r)?);
    }
    r.finish()?;
    Ok(Task { mlir_code, inputs })
}

pub fn encode_handle(info: &StoredInfo) -> Vec<u8> {
    let mut w = Writer::with_capacity(INPUT_FIXED_LEN + info.identifier.len());
    put_handle(&mut w, info);
    w.finish()
}

pub fn decode_handle(bytes: &[u8]) -> Result<StoredInfo, WireError> {
    let mut r = Reader::new(bytes);
    let info = read_handle(&mut r)?;
    r.finish()?;
    Ok(info)
}

/// Body of a BROADCAST / *-SIZE notice.
pub fn encode_size(len: usize) -> [u8; SIZE_LEN] {
    (len as u64).to_le_bytes()
}

pub fn decode_size(bytes: &[u8]) -> Result<u64, WireError> {
    let mut r = Reader::new(bytes);
    let len = r.u64("size")?;
    r.finish()?;
    Ok(len)
}

/// OBJECT-ID bodies are the bare identifier; the probe supplies the length,
/// so every body is a valid identifier.
pub fn encode_object_id(identifier: &[u8]) -> Vec<u8> {
    identifier.to_vec()
}

pub fn decode_object_id(bytes: &[u8]) -> ByteText {
    ByteText::from(bytes)
}

fn put_handle(w: &mut Writer, info: &StoredInfo) {
    w.put_prefixed(&info.identifier);
    w.put_u64(info.num_rows);
    w.put_u64(info.num_cols);
}

fn read_handle(r: &mut Reader<'_>) -> Result<StoredInfo, WireError> {
    let identifier = ByteText::from(r.prefixed("identifier")?);
    let num_rows = r.u64("num_rows")?;
    let num_cols = r.u64("num_cols")?;
    Ok(StoredInfo { identifier, num_rows, num_cols })
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
