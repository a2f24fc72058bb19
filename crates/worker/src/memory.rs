// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory execution collaborator.

use std::collections::HashMap;

use dd_core::{ObjectId, StoredInfo, Structure, Task};

use crate::error::ExecError;
use crate::executor::Executor;

/// Evaluates a work plan over its bound inputs.
pub trait Kernel: Send {
    fn run(&self, mlir_code: &[u8], inputs: &[&Structure]) -> Result<Structure, ExecError>;
}

impl<F> Kernel for F
where
    F: Fn(&[u8], &[&Structure]) -> Result<Structure, ExecError> + Send,
{
    fn run(&self, mlir_code: &[u8], inputs: &[&Structure]) -> Result<Structure, ExecError> {
        self(mlir_code, inputs)
    }
}

/// Keeps every partition and result as a decoded [`Structure`] under a
/// generated [`ObjectId`].
pub struct MemoryExecutor<K> {
    kernel: K,
    objects: HashMap<ObjectId, Structure>,
}

impl<K: Kernel> MemoryExecutor<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel, objects: HashMap::new() }
    }

    /// Generated ids are always UTF-8, so other identifiers are never held.
    pub fn get(&self, identifier: &[u8]) -> Option<&Structure> {
        std::str::from_utf8(identifier).ok().and_then(|id| self.objects.get(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn keep(&mut self, structure: Structure) -> StoredInfo {
        let id = ObjectId::generate();
        let (rows, cols) = structure.dims();
        let handle = StoredInfo::new(id.as_str(), rows as u64, cols as u64);
        self.objects.insert(id, structure);
        handle
    }
}

impl<K: Kernel> Executor for MemoryExecutor<K> {
    fn store(&mut self, bytes: Vec<u8>) -> Result<StoredInfo, ExecError> {
        let structure = Structure::from_bytes(&bytes)?;
        Ok(self.keep(structure))
    }

    fn execute(&mut self, task: &Task) -> Result<(StoredInfo, Vec<u8>), ExecError> {
        let inputs = task
            .input_keys()
            .map(|key| self.get(key).ok_or_else(|| ExecError::UnknownObject(key.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let result = self.kernel.run(&task.mlir_code, &inputs)?;
        let bytes = result.to_bytes();
        Ok((self.keep(result), bytes))
    }

    fn fetch(&self, identifier: &[u8]) -> Result<Vec<u8>, ExecError> {
        self.get(identifier)
            .map(Structure::to_bytes)
            .ok_or_else(|| ExecError::UnknownObject(identifier.into()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
