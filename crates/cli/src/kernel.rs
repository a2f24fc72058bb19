// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Demo kernel: column sums over the row-wise concatenation of all inputs.

use std::ops::Add;

use dd_core::{DenseMatrix, Structure};
use dd_worker::ExecError;

pub fn column_sums(_mlir_code: &[u8], inputs: &[&Structure]) -> Result<Structure, ExecError> {
    if inputs.is_empty() {
        return Err(ExecError::Kernel("column sums need at least one input".to_string()));
    }
    let f64s: Option<Vec<_>> = inputs
        .iter()
        .map(|s| match s {
            Structure::DenseF64(m) => Some(m),
            Structure::DenseI64(_) => None,
        })
        .collect();
    if let Some(mats) = f64s {
        return sum(&mats).map(Structure::DenseF64);
    }
    let i64s: Option<Vec<_>> = inputs
        .iter()
        .map(|s| match s {
            Structure::DenseI64(m) => Some(m),
            Structure::DenseF64(_) => None,
        })
        .collect();
    match i64s {
        Some(mats) => sum(&mats).map(Structure::DenseI64),
        None => Err(ExecError::Kernel("inputs mix f64 and i64 matrices".to_string())),
    }
}

fn sum<T>(mats: &[&DenseMatrix<T>]) -> Result<DenseMatrix<T>, ExecError>
where
    T: Copy + Default + Add<Output = T>,
{
    let cols = mats.first().map_or(0, |m| m.num_cols());
    if let Some(m) = mats.iter().find(|m| m.num_cols() != cols) {
        return Err(ExecError::Kernel(format!(
            "column counts differ: {} and {}",
            cols,
            m.num_cols()
        )));
    }
    let mut totals = vec![T::default(); cols];
    for m in mats {
        for r in 0..m.num_rows() {
            for (total, v) in totals.iter_mut().zip(m.row(r)) {
                *total = *total + *v;
            }
        }
    }
    DenseMatrix::from_rows(1, cols, totals)
        .ok_or_else(|| ExecError::Kernel("result shape".to_string()))
}
