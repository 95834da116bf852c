//! Logical time.
//!
//! The policy stamps every allocation and hit with the current tick and never
//! advances time itself. Time is supplied by the host through [`Clock`], which
//! must be monotonically non-decreasing.
//!
//! Tick `0` is reserved as the epoch sentinel: an invalidated entry carries
//! `last_touch_time == EPOCH` until it is reset or touched. Clocks handed to
//! the policy should therefore start at `1` or later, as [`ManualClock`] does.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Logical timestamp.
pub type Tick = u64;

/// The "never touched since last invalidation" timestamp.
pub const EPOCH: Tick = 0;

/// Source of the current logical time.
pub trait Clock: Send + Sync {
    /// Returns the current tick. Successive calls never decrease.
    fn now(&self) -> Tick;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline(always)]
    fn now(&self) -> Tick {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline(always)]
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// A clock advanced explicitly by its owner.
///
/// Backed by an atomic so it can be shared (`&ManualClock` or `Arc`) between
/// the controller that drives time and the policy that reads it.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock at tick 1, the first tick after the epoch sentinel.
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a clock at `tick`.
    pub const fn starting_at(tick: Tick) -> Self {
        Self {
            now: AtomicU64::new(tick),
        }
    }

    /// Moves time forward by `delta` ticks, saturating at `Tick::MAX`.
    pub fn advance(&self, delta: Tick) {
        let _ = self
            .now
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |t| {
                Some(t.saturating_add(delta))
            });
    }

    /// Moves time forward to `tick`.
    ///
    /// Requests to move backwards are ignored; the clock never decreases.
    pub fn advance_to(&self, tick: Tick) {
        let _ = self.now.fetch_max(tick, Ordering::Relaxed);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    #[inline(always)]
    fn now(&self) -> Tick {
        self.now.load(Ordering::Relaxed)
    }
}
