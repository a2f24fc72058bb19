// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peer addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of one process in the communicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub u32);

/// Conventional coordinator rank; sessions take theirs from configuration.
pub const COORDINATOR: Rank = Rank(0);

impl Rank {
    pub fn new(rank: u32) -> Self {
        Self(rank)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Index into per-rank tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All ranks of a communicator of `world_size` processes except `coordinator`.
    pub fn workers(world_size: usize, coordinator: Rank) -> impl Iterator<Item = Rank> {
        (0..world_size as u32).map(Rank).filter(move |r| *r != coordinator)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(rank: u32) -> Self {
        Self(rank)
    }
}
