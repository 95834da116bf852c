//! Slot identifiers.
//!
//! Replacement data lives in an arena; cache entries refer to their record by
//! a stable index rather than by a shared pointer. This keeps the two-pass
//! victim scan free of aliasing: the scan reads records by id and the decay
//! writes exactly one record by id afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable index of a replacement-data record in its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub usize);

impl SlotId {
    /// Creates a slot id from a raw arena index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for SlotId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
