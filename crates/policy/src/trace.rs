//! Controller Event Traces.
//!
//! A trace records the calls a cache controller made into the replacement
//! policy, one event per line, so a run can be replayed against a
//! [`ReplacementTable`] without the rest of the cache model:
//!
//! ```text
//! # comment
//! fill <set> <way>          reset after installing a block
//! hit  <set> <way> <r|w>    touch on a read or write hit
//! inv  <set> <way>          forced invalidation
//! miss <set>                fill an invalid way, or evict a victim and refill
//! tick <n>                  advance the clock by n ticks
//! ```
//!
//! Every event other than `tick` advances the clock by the configured
//! `tick_per_event` after it executes.

use std::borrow::Borrow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::common::{AccessKind, Clock, Error, ManualClock, Result, Tick};
use crate::config::ReplacementConfig;
use crate::policy::{LfuPolicy, VictimReason};
use crate::stats::PolicyStats;
use crate::table::{MissOutcome, ReplacementTable};

/// One controller event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A block was installed into `(set, way)`.
    Fill {
        /// Set index.
        set: usize,
        /// Way index.
        way: usize,
    },
    /// `(set, way)` hit with the given access kind.
    Hit {
        /// Set index.
        set: usize,
        /// Way index.
        way: usize,
        /// Read or write.
        kind: AccessKind,
    },
    /// `(set, way)` was invalidated.
    Invalidate {
        /// Set index.
        set: usize,
        /// Way index.
        way: usize,
    },
    /// A capacity miss in `set`.
    Miss {
        /// Set index.
        set: usize,
    },
    /// An explicit gap in time.
    Tick {
        /// Ticks to advance.
        delta: Tick,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fill { set, way } => write!(f, "fill {set} {way}"),
            Self::Hit { set, way, kind } => write!(f, "hit {set} {way} {kind}"),
            Self::Invalidate { set, way } => write!(f, "inv {set} {way}"),
            Self::Miss { set } => write!(f, "miss {set}"),
            Self::Tick { delta } => write!(f, "tick {delta}"),
        }
    }
}

fn field<T: FromStr>(tokens: &[&str], index: usize, name: &str) -> std::result::Result<T, String> {
    let token = tokens
        .get(index)
        .ok_or_else(|| format!("missing {name}"))?;
    token
        .parse()
        .map_err(|_| format!("invalid {name} `{token}`"))
}

impl FromStr for TraceEvent {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&op, _)) = tokens.split_first() else {
            return Err("empty event".into());
        };
        let (event, arity) = match op.to_ascii_lowercase().as_str() {
            "fill" => (
                Self::Fill {
                    set: field(&tokens, 1, "set")?,
                    way: field(&tokens, 2, "way")?,
                },
                3,
            ),
            "hit" => {
                let kind: &str = tokens.get(3).copied().ok_or("missing access kind")?;
                (
                    Self::Hit {
                        set: field(&tokens, 1, "set")?,
                        way: field(&tokens, 2, "way")?,
                        kind: kind.parse().map_err(|e: Error| e.to_string())?,
                    },
                    4,
                )
            }
            "inv" | "invalidate" => (
                Self::Invalidate {
                    set: field(&tokens, 1, "set")?,
                    way: field(&tokens, 2, "way")?,
                },
                3,
            ),
            "miss" => (
                Self::Miss {
                    set: field(&tokens, 1, "set")?,
                },
                2,
            ),
            "tick" => (
                Self::Tick {
                    delta: field(&tokens, 1, "tick delta")?,
                },
                2,
            ),
            other => return Err(format!("unknown event `{other}`")),
        };
        if tokens.len() > arity {
            return Err(format!("unexpected trailing `{}`", tokens[arity..].join(" ")));
        }
        Ok(event)
    }
}

/// A parsed event with the line it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceLine {
    /// 1-based line number.
    pub line: usize,
    /// The event on that line.
    pub event: TraceEvent,
}

/// Parses a whole trace, skipping blank lines and `#` comments.
///
/// # Errors
///
/// Returns [`Error::Trace`] naming the first malformed line.
pub fn parse(text: &str) -> Result<Vec<TraceLine>> {
    let mut events = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let event = content
            .parse()
            .map_err(|reason| Error::Trace { line, reason })?;
        events.push(TraceLine { line, event });
    }
    Ok(events)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Trace`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<TraceLine>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// The victim chosen for one `miss` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MissRecord {
    /// Trace line of the miss.
    pub line: usize,
    /// Set that missed.
    pub set: usize,
    /// Way that received the block.
    pub way: usize,
    /// Branch of the selection that chose the victim; `None` for a fill
    /// into an invalid way.
    pub reason: Option<VictimReason>,
    /// Every candidate shared the oldest timestamp.
    pub tied: bool,
}

/// Result of replaying a trace.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayReport {
    /// One record per `miss` event, in trace order.
    pub misses: Vec<MissRecord>,
    /// Table counters after the replay.
    pub stats: PolicyStats,
    /// Clock value after the last event.
    pub final_tick: Tick,
}

/// The manual clock an LFU table's policy reads.
fn clock_of<C>(table: &ReplacementTable<LfuPolicy<C>>) -> &ManualClock
where
    C: Clock + Borrow<ManualClock>,
{
    table.policy().clock().borrow()
}

/// Replays `events` against `table`, advancing the clock its policy reads.
///
/// # Errors
///
/// Returns [`Error::Trace`] for the first event whose indices fall outside
/// the table geometry or that hits an invalid way.
pub fn replay<C>(
    table: &mut ReplacementTable<LfuPolicy<C>>,
    events: &[TraceLine],
    tick_per_event: Tick,
) -> Result<ReplayReport>
where
    C: Clock + Borrow<ManualClock>,
{
    let mut misses = Vec::new();
    for &TraceLine { line, event } in events {
        let step = match event {
            TraceEvent::Fill { set, way } => table.fill(set, way).map(drop),
            TraceEvent::Hit { set, way, kind } => table.hit(set, way, kind).map(drop),
            TraceEvent::Invalidate { set, way } => table.invalidate(set, way).map(drop),
            TraceEvent::Miss { set } => table.miss(set).map(|outcome| {
                let (reason, tied) = match outcome {
                    MissOutcome::Compulsory { .. } => (None, false),
                    MissOutcome::Replaced { decision, .. } => {
                        (Some(decision.reason), decision.tied)
                    }
                };
                misses.push(MissRecord {
                    line,
                    set,
                    way: outcome.way(),
                    reason,
                    tied,
                });
            }),
            TraceEvent::Tick { delta } => {
                clock_of(table).advance(delta);
                continue;
            }
        };
        step.map_err(|e| e.at_line(line))?;
        clock_of(table).advance(tick_per_event);
    }

    let report = ReplayReport {
        misses,
        stats: table.stats().clone(),
        final_tick: clock_of(table).now(),
    };
    info!(
        events = events.len(),
        misses = report.misses.len(),
        final_tick = report.final_tick,
        "replay finished"
    );
    Ok(report)
}

/// Replays `events` on a fresh LFU table built from `config`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for an unusable configuration, otherwise
/// the errors of [`replay`].
pub fn replay_lfu(config: &ReplacementConfig, events: &[TraceLine]) -> Result<ReplayReport> {
    let clock = Arc::new(ManualClock::starting_at(config.start_tick));
    let mut table = ReplacementTable::new(LfuPolicy::new(clock), config)?;
    replay(&mut table, events, config.tick_per_event)
}
