//! Cache Replacement Policies.
//!
//! A replacement policy owns one metadata record per cache entry slot and is
//! driven by the cache controller at four points of the entry lifecycle:
//!
//! - `reset` after every fill,
//! - `touch` before completing every hit,
//! - `invalidate` on every forced invalidation,
//! - `get_victim` on a capacity miss, over the candidate set of one index.
//!
//! Records live in an arena (`&[Self::Data]`) and are named by [`SlotId`], so
//! victim selection reads candidates by id without aliasing the records it
//! may later mutate.
//!
//! # Policies
//!
//! - `Lfu`: hybrid recency/frequency selection between the two oldest candidates.

/// Hybrid recency/frequency replacement policy.
pub mod lfu;

pub use lfu::{LfuPolicy, ReplacementData};

use std::fmt;

use serde::Serialize;

use crate::common::{AccessKind, SlotId};

/// Why a candidate was chosen for eviction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VictimReason {
    /// The candidate set held a single entry.
    SoleCandidate,
    /// The oldest candidate lost because the second-oldest was strictly more frequent.
    FrequencyOverride,
    /// The second-oldest candidate lost the frequency comparison (ties included).
    Recency,
}

/// Outcome of victim selection, before any side effect is applied.
///
/// `decay` names the retained finalist whose frequency is reset to baseline
/// when the decision is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VictimDecision {
    /// Slot chosen for eviction.
    pub victim: SlotId,
    /// Retained finalist to decay, if any.
    pub decay: Option<SlotId>,
    /// Which branch of the selection produced the victim.
    pub reason: VictimReason,
    /// Every candidate shared the oldest timestamp, so the second finalist
    /// was taken by iteration order instead of by recency.
    pub tied: bool,
}

impl VictimDecision {
    /// Decision for a candidate set holding exactly one entry.
    pub const fn sole(victim: SlotId) -> Self {
        Self {
            victim,
            decay: None,
            reason: VictimReason::SoleCandidate,
            tied: false,
        }
    }
}

/// Trait for cache replacement policies.
///
/// Defines the per-entry record and the lifecycle operations the cache
/// controller invokes. Implementations never retain references to records
/// beyond a single call.
pub trait ReplacementPolicy: Send + Sync {
    /// Per-slot replacement metadata.
    type Data: fmt::Debug;

    /// Allocates a record for a newly created slot.
    ///
    /// The record's contents are unspecified until `reset` or `invalidate`
    /// is called on it.
    fn create_entry(&self) -> Self::Data;

    /// Forces a record into the coldest state.
    fn invalidate(&self, data: &mut Self::Data);

    /// Initialises a record after its slot has been filled on a miss.
    fn reset(&self, data: &mut Self::Data);

    /// Updates a record on a cache hit.
    fn touch(&self, data: &mut Self::Data, kind: AccessKind);

    /// Chooses a victim among `candidates` without mutating any record.
    ///
    /// # Arguments
    ///
    /// * `entries` - The record arena the candidate ids index into.
    /// * `candidates` - Slots of one associative set, in iteration order.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty or names a slot outside `entries`.
    fn select_victim<I>(&self, entries: &[Self::Data], candidates: I) -> VictimDecision
    where
        I: IntoIterator<Item = SlotId>,
        I::IntoIter: Clone;

    /// Applies the retained-finalist side effect of a victim decision.
    fn decay(&self, data: &mut Self::Data);

    /// Chooses a victim and applies the decision's decay.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty or names a slot outside `entries`.
    fn get_victim<I>(&self, entries: &mut [Self::Data], candidates: I) -> SlotId
    where
        I: IntoIterator<Item = SlotId>,
        I::IntoIter: Clone,
    {
        let decision = self.select_victim(entries, candidates);
        if let Some(slot) = decision.decay {
            self.decay(&mut entries[slot.index()]);
        }
        decision.victim
    }
}
