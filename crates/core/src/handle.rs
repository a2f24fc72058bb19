// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stored-object handles.
//!
//! A [`StoredInfo`] names a data partition that already lives on one worker.
//! The identifier is chosen by that worker and is opaque everywhere else:
//! the coordinator stores it, logs it, and sends it back, but never parses it.

use serde::{Deserialize, Serialize};

use crate::ByteText;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Handle to an object materialized on a worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredInfo {
    /// Worker-chosen key
    pub identifier: ByteText,
    pub num_rows: u64,
    pub num_cols: u64,
}

impl StoredInfo {
    pub fn new(identifier: impl Into<ByteText>, num_rows: u64, num_cols: u64) -> Self {
        Self { identifier: identifier.into(), num_rows, num_cols }
    }

    /// True when both dimensions are unset (scalars or unknown shape).
    pub fn is_dimensionless(&self) -> bool {
        self.num_rows == 0 && self.num_cols == 0
    }
}

/// Textual form `identifier,rows,cols`; a non-UTF-8 identifier is shown lossily.
impl fmt::Display for StoredInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.identifier, self.num_rows, self.num_cols)
    }
}

/// Errors parsing the textual handle form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleParseError {
    #[error("handle text '{0}' is missing a field (expected identifier,rows,cols)")]
    MissingField(String),

    #[error("handle dimension '{0}' is not an unsigned integer")]
    BadDimension(String),
}

impl FromStr for StoredInfo {
    type Err = HandleParseError;

    /// Dimensions are taken from the right, so identifiers may contain commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.rsplitn(3, ',');
        let (Some(cols), Some(rows), Some(identifier)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(HandleParseError::MissingField(s.to_string()));
        };
        let dim = |field: &str| {
            field.trim().parse::<u64>().map_err(|_| HandleParseError::BadDimension(field.to_string()))
        };
        Ok(Self { identifier: identifier.into(), num_rows: dim(rows)?, num_cols: dim(cols)? })
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
