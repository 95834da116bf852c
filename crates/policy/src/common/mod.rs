//! Common types shared by the policy, the table, and the trace replayer.
//!
//! This module provides the small building blocks every other module leans on:
//! 1. **Time:** The `Tick` timestamp type and the `Clock` abstraction.
//! 2. **Access Kinds:** Read/write classification of cache hits.
//! 3. **Slots:** Stable arena indices for replacement-data records.
//! 4. **Error Handling:** The crate-wide error enum and `Result` alias.

/// Memory access classification for hit handling.
pub mod data;

/// Error types for the table, configuration, and trace layers.
pub mod error;

/// Stable slot identifiers into the replacement-data arena.
pub mod slot;

/// Logical time: ticks and clocks.
pub mod tick;

pub use data::AccessKind;
pub use error::{Error, Result};
pub use slot::SlotId;
pub use tick::{Clock, EPOCH, ManualClock, Tick};
