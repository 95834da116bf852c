//! Hybrid recency/frequency cache replacement policy.
//!
//! This crate implements the replacement half of a set-associative cache model:
//! 1. **Policy:** The `LfuPolicy` engine (create, invalidate, reset, touch, victim selection).
//! 2. **Table:** A slot arena of per-entry replacement data laid out as `sets × ways`.
//! 3. **Trace:** A line-oriented controller event format and a replayer.
//! 4. **Support:** Configuration, statistics, clocks, and error types.
//!
//! Cache indexing, tag comparison, coherence, and timing belong to the host
//! cache model and are not modelled here.

/// Common types (ticks and clocks, access kinds, slot ids, errors).
pub mod common;
/// Replacement table configuration (geometry and replay clocking).
pub mod config;
/// Replacement policy trait and the hybrid LFU implementation.
pub mod policy;
/// Lifecycle and victim-decision counters.
pub mod stats;
/// Slot arena driving the policy at the controller's invocation points.
pub mod table;
/// Controller event traces: parsing and replay.
pub mod trace;

/// Root configuration type; use `ReplacementConfig::default()` or load from JSON.
pub use crate::config::ReplacementConfig;
/// The hybrid recency/frequency policy.
pub use crate::policy::{LfuPolicy, ReplacementData, ReplacementPolicy, VictimDecision};
/// The `sets × ways` replacement-data arena.
pub use crate::table::ReplacementTable;
