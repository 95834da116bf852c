//! Replacement statistics collection and reporting.
//!
//! This module tracks what the controller asked of the policy. It provides:
//! 1. **Lifecycle counts:** Fills, read and write hits, invalidations.
//! 2. **Victim decisions:** Evictions split by the branch that chose the victim.
//! 3. **Derived metrics:** Write-hit ratio and frequency-override rate.

use serde::Serialize;

use crate::policy::{VictimDecision, VictimReason};

/// Counters for every policy invocation made through a `ReplacementTable`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PolicyStats {
    /// Slots reset after a fill.
    pub fills: u64,
    /// Read hits (recency refresh, frequency reset).
    pub read_hits: u64,
    /// Write hits (recency refresh, frequency accumulation).
    pub write_hits: u64,
    /// Forced invalidations.
    pub invalidations: u64,
    /// Victims selected on capacity misses.
    pub evictions: u64,
    /// Evictions from a set holding a single candidate.
    pub single_candidate_evictions: u64,
    /// Evictions of the oldest candidate because the second-oldest was more frequent.
    pub frequency_overrides: u64,
    /// Evictions of the second-oldest candidate.
    pub recency_evictions: u64,
    /// Evictions where every candidate shared the oldest timestamp.
    pub degenerate_ties: u64,
}

impl PolicyStats {
    /// Records one victim decision.
    pub fn record_decision(&mut self, decision: &VictimDecision) {
        self.evictions += 1;
        match decision.reason {
            VictimReason::SoleCandidate => self.single_candidate_evictions += 1,
            VictimReason::FrequencyOverride => self.frequency_overrides += 1,
            VictimReason::Recency => self.recency_evictions += 1,
        }
        if decision.tied {
            self.degenerate_ties += 1;
        }
    }

    /// Total hits of either kind.
    pub const fn hits(&self) -> u64 {
        self.read_hits + self.write_hits
    }

    /// Fraction of hits that were writes, or 0.0 with no hits.
    pub fn write_hit_ratio(&self) -> f64 {
        let hits = self.hits();
        if hits == 0 {
            0.0
        } else {
            self.write_hits as f64 / hits as f64
        }
    }

    /// Fraction of evictions decided by frequency rather than recency, or 0.0 with none.
    pub fn frequency_override_rate(&self) -> f64 {
        if self.evictions == 0 {
            0.0
        } else {
            self.frequency_overrides as f64 / self.evictions as f64
        }
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        println!("==========================================================");
        println!("REPLACEMENT POLICY STATISTICS");
        println!("==========================================================");
        println!("fills                    {}", self.fills);
        println!(
            "hits                     {} (read {}, write {}, write ratio {:.2}%)",
            self.hits(),
            self.read_hits,
            self.write_hits,
            self.write_hit_ratio() * 100.0
        );
        println!("invalidations            {}", self.invalidations);
        println!("----------------------------------------------------------");
        println!("evictions                {}", self.evictions);
        println!(
            "  single candidate       {}",
            self.single_candidate_evictions
        );
        println!(
            "  frequency override     {} ({:.2}%)",
            self.frequency_overrides,
            self.frequency_override_rate() * 100.0
        );
        println!("  recency                {}", self.recency_evictions);
        println!("  degenerate ties        {}", self.degenerate_ties);
        println!("==========================================================");
    }
}
