//! # Common Type Tests
//!
//! Access-kind parsing, slot ids, clocks, and error messages.

use std::sync::Arc;

use lfurp_core::common::{AccessKind, Clock, Error, ManualClock, SlotId};
use rstest::rstest;

#[rstest]
#[case("r", AccessKind::Read)]
#[case("read", AccessKind::Read)]
#[case("W", AccessKind::Write)]
#[case("Write", AccessKind::Write)]
fn access_kind_parses_short_and_long_forms(#[case] text: &str, #[case] expected: AccessKind) {
    assert_eq!(text.parse::<AccessKind>().unwrap(), expected);
}

#[test]
fn access_kind_rejects_unknown_token() {
    let err = "rw".parse::<AccessKind>().unwrap_err();
    assert!(matches!(err, Error::InvalidAccessKind(ref token) if token == "rw"));
    assert!(err.to_string().contains("`rw`"));
}

#[test]
fn access_kind_display_and_write_flag() {
    assert_eq!(AccessKind::Read.to_string(), "r");
    assert_eq!(AccessKind::Write.to_string(), "w");
    assert!(AccessKind::Write.is_write());
    assert!(!AccessKind::Read.is_write());
}

#[test]
fn access_kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&AccessKind::Write).unwrap(), "\"write\"");
    let kind: AccessKind = serde_json::from_str("\"read\"").unwrap();
    assert_eq!(kind, AccessKind::Read);
}

#[test]
fn slot_id_round_trips_raw_index() {
    let slot = SlotId::from(7);
    assert_eq!(slot, SlotId::new(7));
    assert_eq!(slot.index(), 7);
    assert_eq!(slot.to_string(), "#7");
    assert_eq!(serde_json::to_string(&slot).unwrap(), "7");
}

#[test]
fn manual_clock_advance_saturates() {
    let clock = ManualClock::starting_at(u64::MAX - 1);
    clock.advance(10);
    assert_eq!(clock.now(), u64::MAX);
}

#[test]
fn clock_is_shareable_across_threads() {
    let clock = Arc::new(ManualClock::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let clock = Arc::clone(&clock);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    clock.advance(1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(clock.now(), 401);
}

#[test]
fn error_messages_name_the_offending_index() {
    let err = Error::SetOutOfRange { set: 9, sets: 4 };
    assert_eq!(err.to_string(), "set 9 out of range (table has 4 sets)");

    let err = Error::SlotOutOfRange {
        slot: SlotId::new(12),
        len: 8,
    };
    assert_eq!(err.to_string(), "slot #12 out of range (arena holds 8 slots)");
}

#[test]
fn at_line_wraps_once() {
    let err = Error::WayOutOfRange { way: 5, ways: 4 }.at_line(3);
    assert_eq!(
        err.to_string(),
        "trace line 3: way 5 out of range (table has 4 ways)"
    );

    let again = err.at_line(10);
    assert!(matches!(again, Error::Trace { line: 3, .. }));
}
