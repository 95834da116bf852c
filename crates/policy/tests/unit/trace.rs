//! # Trace Replay Tests
//!
//! Replays small controller traces end to end and checks the miss log,
//! the counters, and how the clock advances between events.

use std::fs;

use lfurp_core::common::{Clock, Error, SlotId};
use lfurp_core::config::ReplacementConfig;
use lfurp_core::policy::VictimReason;
use lfurp_core::trace::{self, MissRecord};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::common::harness::{record, table};

const WRITE_THEN_MISS: &str = "\
# two-way set, way 1 written once before the set overflows
miss 0
miss 0
hit 0 1 w
miss 0
";

#[test]
fn replay_logs_compulsory_and_replacement_misses() {
    let events = trace::parse(WRITE_THEN_MISS).unwrap();
    let report = trace::replay_lfu(&ReplacementConfig::with_geometry(1, 2), &events).unwrap();

    assert_eq!(
        report.misses,
        vec![
            MissRecord { line: 2, set: 0, way: 0, reason: None, tied: false },
            MissRecord { line: 3, set: 0, way: 1, reason: None, tied: false },
            MissRecord {
                line: 5,
                set: 0,
                way: 0,
                reason: Some(VictimReason::FrequencyOverride),
                tied: false,
            },
        ]
    );
    assert_eq!(report.stats.fills, 3);
    assert_eq!(report.stats.write_hits, 1);
    assert_eq!(report.stats.evictions, 1);
    assert_eq!(report.stats.frequency_overrides, 1);
    assert_eq!(report.final_tick, 5);
}

#[test]
fn frozen_clock_produces_a_degenerate_tie() {
    let config = ReplacementConfig {
        tick_per_event: 0,
        ..ReplacementConfig::with_geometry(1, 2)
    };
    let events = trace::parse("fill 0 0\nfill 0 1\nmiss 0\n").unwrap();
    let report = trace::replay_lfu(&config, &events).unwrap();

    assert_eq!(
        report.misses,
        vec![MissRecord {
            line: 3,
            set: 0,
            way: 1,
            reason: Some(VictimReason::Recency),
            tied: true,
        }]
    );
    assert_eq!(report.stats.degenerate_ties, 1);
    assert_eq!(report.final_tick, 1);
}

#[test]
fn tick_events_advance_only_by_their_delta() {
    let (clock, mut table) = table(1, 2);
    let events = trace::parse("fill 0 0\ntick 100\nfill 0 1\n").unwrap();

    let report = trace::replay(&mut table, &events, 1).unwrap();

    assert_eq!(*table.entry(SlotId::new(0)).unwrap(), record(1, 1));
    assert_eq!(*table.entry(SlotId::new(1)).unwrap(), record(1, 102));
    assert_eq!(report.final_tick, 103);
    assert_eq!(clock.now(), 103);
    assert!(report.misses.is_empty());
}

#[test]
fn replay_advances_the_clock_the_policy_reads() {
    let (clock, mut table) = table(1, 1);
    clock.advance_to(40);
    let events = trace::parse("fill 0 0\nhit 0 0 w\n").unwrap();

    let report = trace::replay(&mut table, &events, 5).unwrap();

    assert_eq!(*table.entry(SlotId::new(0)).unwrap(), record(2, 45));
    assert_eq!(report.final_tick, 50);
}

#[test]
fn hit_after_invalidation_names_its_line() {
    let text = "miss 0\nmiss 0\ninv 0 1\nhit 0 1 w\n";
    let events = trace::parse(text).unwrap();
    let err = trace::replay_lfu(&ReplacementConfig::with_geometry(1, 2), &events).unwrap_err();

    match err {
        Error::Trace { line, reason } => {
            assert_eq!(line, 4);
            assert_eq!(reason, "hit on invalid way 1 of set 0");
        }
        other => panic!("expected trace error, got {other:?}"),
    }
}

#[test]
fn out_of_range_event_names_its_line() {
    let events = trace::parse("fill 0 0\n\n# comment\nhit 0 9 r\n").unwrap();
    let err = trace::replay_lfu(&ReplacementConfig::with_geometry(1, 2), &events).unwrap_err();

    match err {
        Error::Trace { line, reason } => {
            assert_eq!(line, 4);
            assert!(reason.contains("way 9 out of range"), "{reason}");
        }
        other => panic!("expected trace error, got {other:?}"),
    }
}

#[test]
fn invalid_configuration_is_rejected_before_replay() {
    let events = trace::parse("miss 0\n").unwrap();
    let config = ReplacementConfig::with_geometry(0, 4);
    assert!(matches!(
        trace::replay_lfu(&config, &events),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn report_serializes_reasons_in_snake_case() {
    let events = trace::parse(WRITE_THEN_MISS).unwrap();
    let report = trace::replay_lfu(&ReplacementConfig::with_geometry(1, 2), &events).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["misses"][0]["reason"], serde_json::Value::Null);
    assert_eq!(json["misses"][2]["reason"], "frequency_override");
    assert_eq!(json["final_tick"], 5);
}

#[test]
fn parse_file_reads_traces_and_reports_missing_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("l1d.trace");
    fs::write(&path, WRITE_THEN_MISS).unwrap();

    let events = trace::parse_file(&path).unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].line, 2);

    let missing = dir.path().join("absent.trace");
    assert!(matches!(
        trace::parse_file(&missing),
        Err(Error::Io { .. })
    ));
}
