//! Error definitions.
//!
//! The replacement policy itself has no recoverable failures: its lifecycle
//! operations are total and an empty candidate set is a contract breach that
//! panics. The layers around it (slot arena, configuration, trace replay) do
//! validate caller input and report problems through [`Error`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::slot::SlotId;

/// Convenience alias used by the table, configuration, and trace layers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the core policy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A slot id does not name an allocated replacement-data record.
    #[error("slot {slot} out of range (arena holds {len} slots)")]
    SlotOutOfRange {
        /// The offending slot.
        slot: SlotId,
        /// Number of allocated slots.
        len: usize,
    },

    /// A set index is outside the table geometry.
    #[error("set {set} out of range (table has {sets} sets)")]
    SetOutOfRange {
        /// The offending set index.
        set: usize,
        /// Number of sets in the table.
        sets: usize,
    },

    /// A way index is outside the table geometry.
    #[error("way {way} out of range (table has {ways} ways)")]
    WayOutOfRange {
        /// The offending way index.
        way: usize,
        /// Associativity of the table.
        ways: usize,
    },

    /// A hit named a way that holds no block.
    #[error("hit on invalid way {way} of set {set}")]
    NotResident {
        /// Set index of the hit.
        set: usize,
        /// Way index of the hit.
        way: usize,
    },

    /// The configured geometry or clocking cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An access kind token was neither read nor write.
    #[error("invalid access kind `{0}` (expected r/read or w/write)")]
    InvalidAccessKind(String),

    /// A trace line could not be parsed or replayed.
    #[error("trace line {line}: {reason}")]
    Trace {
        /// 1-based line number in the trace.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// Configuration or report JSON failed to (de)serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration or trace file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wraps an error raised while handling trace line `line`.
    ///
    /// Errors that already carry a line number are passed through unchanged.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::Trace { .. } => self,
            other => Self::Trace {
                line,
                reason: other.to_string(),
            },
        }
    }
}
