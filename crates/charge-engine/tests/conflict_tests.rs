//! Tests for the overlap test and first-conflict lookup.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use charge_engine::conflict::find_conflict;
use charge_engine::{intersects, Color, Occurrence};

fn base() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap().fixed_offset()
}

/// Occurrence spanning `[base + from_s, base + to_s]` seconds.
fn span(from_s: i64, to_s: i64) -> Occurrence {
    Occurrence {
        id: 1,
        color: Color::Available,
        start: base() + Duration::seconds(from_s),
        end: base() + Duration::seconds(to_s),
    }
}

#[test]
fn disjoint_occurrences_do_not_intersect() {
    assert!(!intersects(&span(-1, 0), &span(1, 2)));
    assert!(!intersects(&span(1, 2), &span(-1, 0)));
}

#[test]
fn touching_endpoints_intersect() {
    // a.end == b.start
    assert!(intersects(&span(-1, 0), &span(0, 1)));
    // a.start == b.end
    assert!(intersects(&span(0, 1), &span(-1, 0)));
}

#[test]
fn partial_overlap_intersects_either_order() {
    assert!(intersects(&span(0, 2), &span(-1, 1)));
    assert!(intersects(&span(-2, 0), &span(-1, 1)));
}

#[test]
fn contained_occurrence_intersects() {
    assert!(intersects(&span(-1, 1), &span(-2, 2)));
    assert!(intersects(&span(-2, 2), &span(-1, 1)));
}

#[test]
fn identical_starts_intersect() {
    assert!(intersects(&span(0, 5), &span(0, 1)));
}

#[test]
fn boundary_rule_unit_intervals() {
    // [0,1] and [1,2] touch; [0,1] and [1.5,2] do not.
    let a = span(0, 3600);
    assert!(intersects(&a, &span(3600, 7200)));
    assert!(!intersects(&a, &span(5400, 7200)));
}

#[test]
fn find_conflict_returns_first_hit_in_candidate_order() {
    let mut first = span(100, 200);
    first.id = 7;
    let mut second = span(300, 400);
    second.id = 8;
    let existing = [second, first];

    let candidates = [span(150, 160), span(350, 360)];
    let hit = find_conflict(&candidates, &existing).expect("should conflict");
    assert_eq!(hit.id, 7);
}

#[test]
fn find_conflict_none_when_clear() {
    let existing = [span(100, 200)];
    assert!(find_conflict(&[span(201, 300)], &existing).is_none());
    assert!(find_conflict(&[], &existing).is_none());
    assert!(find_conflict(&[span(0, 10)], &[]).is_none());
}
