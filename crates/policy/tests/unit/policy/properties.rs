//! Randomized Policy Invariants.
//!
//! Property tests over arbitrary candidate sets and access sequences.
//! Timestamps are drawn from a narrow range so ties are frequent.

use lfurp_core::common::{AccessKind, Clock, SlotId, Tick};
use lfurp_core::{ReplacementData, ReplacementPolicy};
use proptest::prelude::*;

use crate::common::harness::TestContext;

fn arena() -> impl Strategy<Value = Vec<(Tick, u32)>> {
    prop::collection::vec((0u64..12, 1u32..8), 1..12)
}

fn accesses() -> impl Strategy<Value = Vec<(bool, u64)>> {
    prop::collection::vec((any::<bool>(), 0u64..4), 0..40)
}

proptest! {
    #[test]
    fn victim_is_a_candidate_and_only_the_decayed_finalist_changes(states in arena()) {
        let mut ctx = TestContext::new().with_entries(&states);
        let before = ctx.entries.clone();
        let candidates = ctx.all_slots();

        let decision = ctx.policy.select_victim(&ctx.entries, candidates.iter().copied());
        let victim = ctx.policy.get_victim(&mut ctx.entries, candidates.iter().copied());

        prop_assert_eq!(victim, decision.victim);
        prop_assert!(candidates.contains(&victim));
        prop_assert_eq!(ctx.entries.len(), before.len());

        for (index, (now, then)) in ctx.entries.iter().zip(&before).enumerate() {
            prop_assert_eq!(now.last_touch_time(), then.last_touch_time());
            if decision.decay == Some(SlotId::new(index)) {
                prop_assert_eq!(now.reference_count(), 1);
            } else {
                prop_assert_eq!(now.reference_count(), then.reference_count());
            }
        }
    }

    #[test]
    fn victim_is_among_the_two_oldest_timestamps(states in arena()) {
        let mut ctx = TestContext::new().with_entries(&states);
        let candidates = ctx.all_slots();

        let mut ticks: Vec<Tick> = states.iter().map(|&(t, _)| t).collect();
        ticks.sort_unstable();
        ticks.dedup();
        let oldest = ticks[0];
        let next = ticks.get(1).copied().unwrap_or(oldest);

        let victim = ctx.policy.get_victim(&mut ctx.entries, candidates);
        let victim_tick = ctx.entries[victim.index()].last_touch_time();

        prop_assert!(victim_tick == oldest || victim_tick == next);
    }

    #[test]
    fn finalists_are_distinct_when_more_than_one_slot(states in arena()) {
        let ctx = TestContext::new().with_entries(&states);
        let decision = ctx.policy.select_victim(&ctx.entries, ctx.all_slots());

        match decision.decay {
            Some(retained) => {
                prop_assert!(states.len() > 1);
                prop_assert_ne!(retained, decision.victim);
            }
            None => prop_assert_eq!(states.len(), 1),
        }
    }

    #[test]
    fn reference_count_stays_positive_under_any_access_sequence(seq in accesses()) {
        let ctx = TestContext::new();
        let mut data: ReplacementData = ctx.policy.create_entry();
        ctx.policy.reset(&mut data);

        let mut writes_since_read = 0u32;
        for (is_write, gap) in seq {
            ctx.clock.advance(gap);
            let kind = if is_write { AccessKind::Write } else { AccessKind::Read };
            ctx.policy.touch(&mut data, kind);

            writes_since_read = if is_write { writes_since_read + 1 } else { 0 };
            prop_assert!(data.reference_count() >= 1);
            prop_assert_eq!(data.reference_count(), writes_since_read + 1);
            prop_assert_eq!(data.last_touch_time(), ctx.clock.now());
        }
    }
}
