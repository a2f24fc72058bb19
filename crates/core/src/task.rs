// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatched units of work.

use crate::{ByteText, StoredInfo};

/// A compiled work plan plus the handles bound to its parameters.
///
/// `inputs` are positional: the i-th handle binds the plan's i-th formal
/// parameter. The plan text is never interpreted by the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Task {
    pub mlir_code: ByteText,
    pub inputs: Vec<StoredInfo>,
}

impl Task {
    pub fn new(mlir_code: impl Into<ByteText>, inputs: Vec<StoredInfo>) -> Self {
        Self { mlir_code: mlir_code.into(), inputs }
    }

    /// Identifiers of the inputs, in binding order.
    pub fn input_keys(&self) -> impl Iterator<Item = &ByteText> {
        self.inputs.iter().map(|i| &i.identifier)
    }
}

crate::builder! {
    pub struct TaskBuilder => Task {
        mlir_code: ByteText = "compute(e)",
        inputs: Vec<StoredInfo> = vec![StoredInfo::new("X", 4, 4)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let task = Task::builder().build();
        assert_eq!(task.mlir_code, "compute(e)");
        assert_eq!(task.inputs, vec![StoredInfo::new("X", 4, 4)]);
    }

    #[test]
    fn builder_setters_override_defaults() {
        let task = Task::builder().mlir_code("f(a)").inputs(Vec::new()).build();
        assert_eq!(task, Task::new("f(a)", Vec::new()));
    }

    #[test]
    fn input_keys_keep_binding_order() {
        let task = Task::new(
            "f(a, b)",
            vec![StoredInfo::new("b", 1, 1), StoredInfo::new("a", 2, 2)],
        );
        assert_eq!(task.input_keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
