// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proptest strategies shared with other crates' tests.

use crate::{StoredInfo, Task};
use proptest::prelude::*;

/// Arbitrary handle: any identifier bytes, any dimensions.
pub fn arb_stored_info() -> impl Strategy<Value = StoredInfo> {
    (bytes(24), any::<u64>(), any::<u64>()).prop_map(|(identifier, num_rows, num_cols)| {
        StoredInfo { identifier: identifier.into(), num_rows, num_cols }
    })
}

/// Arbitrary task with up to `max_inputs` inputs.
pub fn arb_task(max_inputs: usize) -> impl Strategy<Value = Task> {
    (bytes(64), prop::collection::vec(arb_stored_info(), 0..=max_inputs))
        .prop_map(|(mlir_code, inputs)| Task { mlir_code: mlir_code.into(), inputs })
}

fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max)
}
