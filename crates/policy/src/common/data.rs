//! Memory Access Kinds.
//!
//! Classifies the access that produced a cache hit. The policy rewards write
//! locality with frequency weight and treats read hits as pure recency
//! refreshes, so the controller passes the kind explicitly on every touch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// Kind of access that hit in the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Data read (load). Refreshes recency and resets frequency to 1.
    Read,

    /// Data write (store). Refreshes recency and accumulates frequency.
    Write,
}

impl AccessKind {
    /// Returns `true` for [`AccessKind::Write`].
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "r"),
            Self::Write => write!(f, "w"),
        }
    }
}

impl FromStr for AccessKind {
    type Err = Error;

    /// Parses `r`/`read` or `w`/`write` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "read" => Ok(Self::Read),
            "w" | "write" => Ok(Self::Write),
            _ => Err(Error::InvalidAccessKind(s.to_string())),
        }
    }
}
