//! Replacement-Data Table.
//!
//! The table is the arena that owns one replacement-data record per cache
//! entry slot, laid out set-major: the ways of set `s` occupy slots
//! `s * ways .. (s + 1) * ways`. It stands where the host cache's tag array
//! would call into the policy:
//!
//! - `fill` after a block is installed (policy `reset`),
//! - `hit` before a hit completes (policy `touch`),
//! - `invalidate` on a forced invalidation,
//! - `evict` / `miss` on a capacity miss (policy `get_victim`).
//!
//! Like a tag array, the table keeps a valid bit per slot. A miss in a set
//! that still has an invalid way is compulsory: the first invalid way is
//! filled and the policy is not consulted. A hit on an invalid way is
//! rejected.
//!
//! Geometry indices are checked and reported as [`Error`]s; the policy's own
//! contract (non-empty candidate sets) is guaranteed by construction.

use std::ops::Range;

use tracing::debug;

use crate::common::{AccessKind, Error, Result, SlotId};
use crate::config::ReplacementConfig;
use crate::policy::{ReplacementPolicy, VictimDecision};
use crate::stats::PolicyStats;

/// Candidate iterator over the slots of one set.
pub type SetCandidates = std::iter::Map<Range<usize>, fn(usize) -> SlotId>;

/// How a miss obtained its way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissOutcome {
    /// The set had an invalid way; it was filled without eviction.
    Compulsory {
        /// Way that received the block.
        way: usize,
    },
    /// The set was full; the policy chose a victim whose way was refilled.
    Replaced {
        /// Way that received the block.
        way: usize,
        /// The policy's decision.
        decision: VictimDecision,
    },
}

impl MissOutcome {
    /// Way that received the incoming block.
    pub const fn way(&self) -> usize {
        match self {
            Self::Compulsory { way } | Self::Replaced { way, .. } => *way,
        }
    }
}

/// Arena of replacement data for a `sets × ways` cache.
#[derive(Debug)]
pub struct ReplacementTable<P: ReplacementPolicy> {
    policy: P,
    entries: Vec<P::Data>,
    valid: Vec<bool>,
    sets: usize,
    ways: usize,
    stats: PolicyStats,
}

impl<P: ReplacementPolicy> ReplacementTable<P> {
    /// Creates a table whose every slot starts invalidated.
    ///
    /// # Arguments
    ///
    /// * `policy` - The replacement policy driving every slot.
    /// * `config` - Geometry of the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not validate.
    pub fn new(policy: P, config: &ReplacementConfig) -> Result<Self> {
        config.validate()?;
        let mut entries = Vec::with_capacity(config.slots());
        for _ in 0..config.slots() {
            let mut data = policy.create_entry();
            policy.invalidate(&mut data);
            entries.push(data);
        }
        Ok(Self {
            policy,
            valid: vec![false; entries.len()],
            entries,
            sets: config.sets,
            ways: config.ways,
            stats: PolicyStats::default(),
        })
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The policy driving the table.
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Counters for every operation performed through the table.
    pub const fn stats(&self) -> &PolicyStats {
        &self.stats
    }

    /// All records, indexed by [`SlotId::index`].
    pub fn entries(&self) -> &[P::Data] {
        &self.entries
    }

    /// Returns the slot holding `(set, way)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`] or [`Error::WayOutOfRange`].
    pub fn slot(&self, set: usize, way: usize) -> Result<SlotId> {
        if set >= self.sets {
            return Err(Error::SetOutOfRange {
                set,
                sets: self.sets,
            });
        }
        if way >= self.ways {
            return Err(Error::WayOutOfRange {
                way,
                ways: self.ways,
            });
        }
        Ok(SlotId::new(set * self.ways + way))
    }

    /// Returns the way a slot occupies within its set.
    pub const fn way_of(&self, slot: SlotId) -> usize {
        slot.index() % self.ways
    }

    /// Returns `true` if `(set, way)` holds a block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`] or [`Error::WayOutOfRange`].
    pub fn is_valid(&self, set: usize, way: usize) -> Result<bool> {
        let slot = self.slot(set, way)?;
        Ok(self.valid[slot.index()])
    }

    /// Returns the record stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] for a slot outside the arena.
    pub fn entry(&self, slot: SlotId) -> Result<&P::Data> {
        self.entries.get(slot.index()).ok_or(Error::SlotOutOfRange {
            slot,
            len: self.entries.len(),
        })
    }

    /// Returns the record for `(set, way)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`] or [`Error::WayOutOfRange`].
    pub fn entry_at(&self, set: usize, way: usize) -> Result<&P::Data> {
        let slot = self.slot(set, way)?;
        self.entry(slot)
    }

    /// Returns the candidate slots of `set`, in way order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`].
    pub fn candidates(&self, set: usize) -> Result<SetCandidates> {
        let base = self.slot(set, 0)?.index();
        Ok((base..base + self.ways).map(SlotId::new as fn(usize) -> SlotId))
    }

    /// Resets `(set, way)` after a block was installed into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`] or [`Error::WayOutOfRange`].
    pub fn fill(&mut self, set: usize, way: usize) -> Result<SlotId> {
        let slot = self.slot(set, way)?;
        self.policy.reset(&mut self.entries[slot.index()]);
        self.valid[slot.index()] = true;
        self.stats.fills += 1;
        debug!(set, way, "fill");
        Ok(slot)
    }

    /// Touches `(set, way)` on a cache hit of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`] or [`Error::WayOutOfRange`], or
    /// [`Error::NotResident`] if the way is invalid.
    pub fn hit(&mut self, set: usize, way: usize, kind: AccessKind) -> Result<SlotId> {
        let slot = self.slot(set, way)?;
        if !self.valid[slot.index()] {
            return Err(Error::NotResident { set, way });
        }
        self.policy.touch(&mut self.entries[slot.index()], kind);
        match kind {
            AccessKind::Read => self.stats.read_hits += 1,
            AccessKind::Write => self.stats.write_hits += 1,
        }
        Ok(slot)
    }

    /// Invalidates `(set, way)`, making it the coldest slot of its set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`] or [`Error::WayOutOfRange`].
    pub fn invalidate(&mut self, set: usize, way: usize) -> Result<SlotId> {
        let slot = self.slot(set, way)?;
        self.policy.invalidate(&mut self.entries[slot.index()]);
        self.valid[slot.index()] = false;
        self.stats.invalidations += 1;
        debug!(set, way, "invalidate");
        Ok(slot)
    }

    /// Chooses the victim of `set` without applying any side effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`].
    pub fn select_victim(&self, set: usize) -> Result<VictimDecision> {
        let candidates = self.candidates(set)?;
        Ok(self.policy.select_victim(&self.entries, candidates))
    }

    /// Chooses the victim of `set` and applies the decision's decay.
    ///
    /// The victim's own record is left as it was; the controller resets it
    /// when the incoming block is filled (see [`ReplacementTable::miss`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`].
    pub fn evict(&mut self, set: usize) -> Result<VictimDecision> {
        let decision = self.select_victim(set)?;
        self.apply(&decision);
        debug!(
            set,
            way = self.way_of(decision.victim),
            reason = ?decision.reason,
            "evict"
        );
        Ok(decision)
    }

    /// Chooses a victim among an arbitrary candidate list.
    ///
    /// For hosts whose candidate sets are not contiguous ways (e.g. skewed
    /// caches). Candidates are considered in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] if any candidate is outside the arena.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty.
    pub fn evict_among(&mut self, candidates: &[SlotId]) -> Result<VictimDecision> {
        if let Some(&slot) = candidates
            .iter()
            .find(|slot| slot.index() >= self.entries.len())
        {
            return Err(Error::SlotOutOfRange {
                slot,
                len: self.entries.len(),
            });
        }
        let decision = self
            .policy
            .select_victim(&self.entries, candidates.iter().copied());
        self.apply(&decision);
        debug!(victim = %decision.victim, reason = ?decision.reason, "evict among");
        Ok(decision)
    }

    /// Handles a miss in `set` and fills the way that receives the block.
    ///
    /// The first invalid way is used if there is one; otherwise the policy
    /// chooses a victim (applying its decay) and the victim's way is refilled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SetOutOfRange`].
    pub fn miss(&mut self, set: usize) -> Result<MissOutcome> {
        let free = self
            .candidates(set)?
            .find(|slot| !self.valid[slot.index()])
            .map(|slot| self.way_of(slot));

        let outcome = match free {
            Some(way) => MissOutcome::Compulsory { way },
            None => {
                let decision = self.evict(set)?;
                MissOutcome::Replaced {
                    way: self.way_of(decision.victim),
                    decision,
                }
            }
        };
        let _ = self.fill(set, outcome.way())?;
        Ok(outcome)
    }

    fn apply(&mut self, decision: &VictimDecision) {
        if let Some(slot) = decision.decay {
            self.policy.decay(&mut self.entries[slot.index()]);
        }
        self.stats.record_decision(decision);
    }
}
