//! Hybrid LFU Replacement Policy.
//!
//! Recency is the primary eviction signal; frequency only arbitrates between
//! the two least-recently-used candidates of a set.
//!
//! - **Hit (`touch`):** stamps the current tick. A write hit adds one to the
//!   reference count; a read hit resets it to 1. Only write locality builds
//!   frequency weight.
//! - **Miss (`get_victim`):** finds the oldest candidate and the oldest
//!   candidate with a strictly later timestamp. The oldest is evicted only if
//!   the second-oldest has a strictly higher reference count; otherwise the
//!   second-oldest goes. Either way the finalist that stays has its reference
//!   count reset to 1.
//!
//! When every candidate shares the oldest timestamp there is no "strictly
//! later" finalist. The second finalist is then the first candidate, in
//! iteration order, other than the oldest.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()` / `reset()` / `invalidate()`: O(1)
//!   - `get_victim()`: O(W), two passes over the W candidates
//! - **Space Complexity:** O(S × W) records, one counter and one tick each
//! - **Allocation:** none on any operation

use tracing::trace;

use super::{ReplacementPolicy, VictimDecision, VictimReason};
use crate::common::{AccessKind, Clock, EPOCH, SlotId, Tick};

/// Replacement metadata for one cache entry slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplacementData {
    reference_count: u32,
    last_touch_time: Tick,
}

impl ReplacementData {
    /// Builds a record with explicit state.
    pub const fn from_parts(reference_count: u32, last_touch_time: Tick) -> Self {
        Self {
            reference_count,
            last_touch_time,
        }
    }

    /// Frequency signal; at least 1 for every reset, touched, or invalidated record.
    #[inline(always)]
    pub const fn reference_count(&self) -> u32 {
        self.reference_count
    }

    /// Tick of the latest fill or hit, or [`EPOCH`] after an invalidation.
    #[inline(always)]
    pub const fn last_touch_time(&self) -> Tick {
        self.last_touch_time
    }

    /// Returns `true` if the record was invalidated and not touched since.
    #[inline(always)]
    pub const fn is_cold(&self) -> bool {
        self.last_touch_time == EPOCH
    }
}

/// Hybrid recency/frequency policy reading time from `C`.
#[derive(Debug)]
pub struct LfuPolicy<C> {
    clock: C,
}

impl<C: Clock> LfuPolicy<C> {
    /// Creates a policy that stamps records with `clock`'s ticks.
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Returns the policy's clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> ReplacementPolicy for LfuPolicy<C> {
    type Data = ReplacementData;

    fn create_entry(&self) -> ReplacementData {
        ReplacementData::default()
    }

    fn invalidate(&self, data: &mut ReplacementData) {
        data.reference_count = 1;
        data.last_touch_time = EPOCH;
    }

    fn reset(&self, data: &mut ReplacementData) {
        data.reference_count = 1;
        data.last_touch_time = self.clock.now();
    }

    fn touch(&self, data: &mut ReplacementData, kind: AccessKind) {
        data.last_touch_time = self.clock.now();
        data.reference_count = match kind {
            AccessKind::Write => data.reference_count.saturating_add(1),
            AccessKind::Read => 1,
        };
    }

    fn select_victim<I>(&self, entries: &[ReplacementData], candidates: I) -> VictimDecision
    where
        I: IntoIterator<Item = SlotId>,
        I::IntoIter: Clone,
    {
        let candidates = candidates.into_iter();
        let Some(first) = candidates.clone().next() else {
            panic!("victim selection requires at least one candidate");
        };
        if candidates.clone().nth(1).is_none() {
            return VictimDecision::sole(first);
        }

        let tick = |slot: SlotId| entries[slot.index()].last_touch_time;
        let count = |slot: SlotId| entries[slot.index()].reference_count;

        let mut oldest = first;
        for slot in candidates.clone() {
            if tick(slot) < tick(oldest) {
                oldest = slot;
            }
        }

        let oldest_tick = tick(oldest);
        let mut second: Option<SlotId> = None;
        for slot in candidates.clone() {
            let t = tick(slot);
            if t > oldest_tick && second.is_none_or(|s| t < tick(s)) {
                second = Some(slot);
            }
        }

        let (second, tied) = match second {
            Some(slot) => (slot, false),
            None => match candidates.clone().find(|&slot| slot != oldest) {
                Some(slot) => (slot, true),
                // Every candidate names the same slot.
                None => return VictimDecision::sole(oldest),
            },
        };

        let decision = if count(second) > count(oldest) {
            VictimDecision {
                victim: oldest,
                decay: Some(second),
                reason: VictimReason::FrequencyOverride,
                tied,
            }
        } else {
            VictimDecision {
                victim: second,
                decay: Some(oldest),
                reason: VictimReason::Recency,
                tied,
            }
        };

        trace!(
            oldest = %oldest,
            oldest_tick,
            oldest_count = count(oldest),
            second = %second,
            second_tick = tick(second),
            second_count = count(second),
            victim = %decision.victim,
            tied,
            "selected victim"
        );

        decision
    }

    fn decay(&self, data: &mut ReplacementData) {
        data.reference_count = 1;
    }
}
