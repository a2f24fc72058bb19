// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory data structures that travel as DATA payloads.
//!
//! Supported structures are a closed set ([`Structure`]). Anything that
//! needs to render one (debug output, the demo binary) goes through
//! [`DisplayData`], dispatched by `match` on the variant.
//!
//! Partition byte layout, all integers little-endian:
//!
//! ```text
//! kind:u8  rows:u64  cols:u64  values[rows * cols]  (8 bytes each)
//! ```

use thiserror::Error;

/// Render a structure for humans.
pub trait DisplayData {
    fn to_display_string(&self) -> String;
}

/// Row-major dense matrix. `row_skip` is the stride between row starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    num_rows: usize,
    num_cols: usize,
    row_skip: usize,
    values: Vec<T>,
}

impl<T: Copy> DenseMatrix<T> {
    /// Build from row-major values. Returns `None` if the length is not `rows * cols`.
    pub fn from_rows(num_rows: usize, num_cols: usize, values: Vec<T>) -> Option<Self> {
        (num_rows.checked_mul(num_cols)? == values.len())
            .then_some(Self { num_rows, num_cols, row_skip: num_cols, values })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn row_skip(&self) -> usize {
        self.row_skip
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        self.values.get(row * self.row_skip + col).copied()
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.row_skip;
        &self.values[start..start + self.num_cols]
    }
}

impl<T: Copy + ToString> DisplayData for DenseMatrix<T> {
    fn to_display_string(&self) -> String {
        (0..self.num_rows)
            .map(|r| self.row(r).iter().map(T::to_string).collect::<Vec<_>>().join(", "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Every structure a worker can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    DenseF64(DenseMatrix<f64>),
    DenseI64(DenseMatrix<i64>),
}

/// Errors decoding a partition payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("partition payload truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("unknown structure kind {0}")]
    UnknownKind(u8),

    #[error("partition payload has {0} trailing bytes")]
    TrailingBytes(usize),
}

const KIND_DENSE_F64: u8 = 0;
const KIND_DENSE_I64: u8 = 1;
const HEADER_LEN: usize = 1 + 8 + 8;

impl Structure {
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Structure::DenseF64(m) => (m.num_rows(), m.num_cols()),
            Structure::DenseI64(m) => (m.num_rows(), m.num_cols()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let (rows, cols) = self.dims();
        let mut buf = Vec::with_capacity(HEADER_LEN + rows * cols * 8);
        let kind = match self {
            Structure::DenseF64(_) => KIND_DENSE_F64,
            Structure::DenseI64(_) => KIND_DENSE_I64,
        };
        buf.push(kind);
        buf.extend_from_slice(&(rows as u64).to_le_bytes());
        buf.extend_from_slice(&(cols as u64).to_le_bytes());
        for r in 0..rows {
            match self {
                Structure::DenseF64(m) => m.row(r).iter().for_each(|v| buf.extend(v.to_le_bytes())),
                Structure::DenseI64(m) => m.row(r).iter().for_each(|v| buf.extend(v.to_le_bytes())),
            }
        }
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StructureError> {
        if bytes.len() < HEADER_LEN {
            return Err(StructureError::Truncated { needed: HEADER_LEN, available: bytes.len() });
        }
        let word = |at: usize| {
            let mut w = [0u8; 8];
            w.copy_from_slice(&bytes[at..at + 8]);
            w
        };
        let rows = u64::from_le_bytes(word(1)) as usize;
        let cols = u64::from_le_bytes(word(9)) as usize;
        let needed = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(8))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .unwrap_or(usize::MAX);
        if bytes.len() < needed {
            return Err(StructureError::Truncated { needed, available: bytes.len() });
        }
        if bytes.len() > needed {
            return Err(StructureError::TrailingBytes(bytes.len() - needed));
        }
        let words = (HEADER_LEN..needed).step_by(8).map(word);
        let structure = match bytes[0] {
            KIND_DENSE_F64 => Structure::DenseF64(DenseMatrix {
                num_rows: rows,
                num_cols: cols,
                row_skip: cols,
                values: words.map(f64::from_le_bytes).collect(),
            }),
            KIND_DENSE_I64 => Structure::DenseI64(DenseMatrix {
                num_rows: rows,
                num_cols: cols,
                row_skip: cols,
                values: words.map(i64::from_le_bytes).collect(),
            }),
            other => return Err(StructureError::UnknownKind(other)),
        };
        Ok(structure)
    }
}

impl DisplayData for Structure {
    fn to_display_string(&self) -> String {
        match self {
            Structure::DenseF64(m) => m.to_display_string(),
            Structure::DenseI64(m) => m.to_display_string(),
        }
    }
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
