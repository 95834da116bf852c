//! Configuration for the replacement table and trace replay.
//!
//! This module defines the one configuration structure the crate needs. It provides:
//! 1. **Defaults:** Baseline geometry (a single 4-way set) and clocking.
//! 2. **Structure:** `ReplacementConfig`, deserialized from JSON.
//! 3. **Validation:** Rejection of geometries and clocks the policy cannot run with.
//!
//! The host cache decides sets and ways; this configuration only mirrors them
//! so a standalone table (or a replayed trace) has the same shape.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{EPOCH, Error, Result, Tick};

/// Default configuration constants.
mod defaults {
    use crate::common::Tick;

    /// Default number of sets (a single fully associative set).
    pub const SETS: usize = 1;

    /// Default associativity.
    pub const WAYS: usize = 4;

    /// Default first tick; the first tick after the epoch sentinel.
    pub const START_TICK: Tick = 1;

    /// Default clock advance after each replayed event.
    pub const TICK_PER_EVENT: Tick = 1;
}

/// Replacement table geometry and replay clocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacementConfig {
    /// Number of sets in the table
    #[serde(default = "ReplacementConfig::default_sets")]
    pub sets: usize,

    /// Associativity (candidates per set)
    #[serde(default = "ReplacementConfig::default_ways")]
    pub ways: usize,

    /// Tick the replay clock starts at
    #[serde(default = "ReplacementConfig::default_start_tick")]
    pub start_tick: Tick,

    /// Ticks the replay clock advances after every event
    #[serde(default = "ReplacementConfig::default_tick_per_event")]
    pub tick_per_event: Tick,
}

impl ReplacementConfig {
    /// Returns the default number of sets.
    const fn default_sets() -> usize {
        defaults::SETS
    }

    /// Returns the default associativity.
    const fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default replay start tick.
    const fn default_start_tick() -> Tick {
        defaults::START_TICK
    }

    /// Returns the default per-event clock advance.
    const fn default_tick_per_event() -> Tick {
        defaults::TICK_PER_EVENT
    }

    /// Creates a configuration with the given geometry and default clocking.
    pub const fn with_geometry(sets: usize, ways: usize) -> Self {
        Self {
            sets,
            ways,
            start_tick: defaults::START_TICK,
            tick_per_event: defaults::TICK_PER_EVENT,
        }
    }

    /// Total number of replacement-data slots (`sets × ways`).
    pub const fn slots(&self) -> usize {
        self.sets.saturating_mul(self.ways)
    }

    /// Checks that the configuration describes a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero sets or ways, a slot count
    /// that overflows `usize`, or a start tick equal to the epoch sentinel.
    pub fn validate(&self) -> Result<()> {
        if self.sets == 0 {
            return Err(Error::InvalidConfig("sets must be at least 1".into()));
        }
        if self.ways == 0 {
            return Err(Error::InvalidConfig("ways must be at least 1".into()));
        }
        if self.sets.checked_mul(self.ways).is_none() {
            return Err(Error::InvalidConfig(format!(
                "{} sets × {} ways overflows the slot index",
                self.sets, self.ways
            )));
        }
        if self.start_tick == EPOCH {
            return Err(Error::InvalidConfig(
                "start_tick 0 is reserved for invalidated entries".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON or unknown fields and
    /// [`Error::InvalidConfig`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the errors
    /// of [`ReplacementConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            sets = config.sets,
            ways = config.ways,
            "loaded replacement configuration"
        );
        Ok(config)
    }
}

impl Default for ReplacementConfig {
    /// A single 4-way set, clock starting at tick 1, one tick per event.
    fn default() -> Self {
        Self::with_geometry(defaults::SETS, defaults::WAYS)
    }
}
