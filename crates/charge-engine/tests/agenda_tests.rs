//! Tests for building per-day slot agendas from merged availability.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use charge_engine::{build_agenda, Color, Occurrence};

fn at(day: u32, hour: u32, min: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2000, 1, day, hour, min, 0)
        .unwrap()
        .fixed_offset()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, day).unwrap()
}

fn green(day: u32, sh: u32, sm: u32, eh: u32, em: u32) -> Occurrence {
    Occurrence {
        id: 1,
        color: Color::Available,
        start: at(day, sh, sm),
        end: at(day, eh, em),
    }
}

#[test]
fn empty_availability_lists_every_day() {
    let agenda = build_agenda(&[], at(1, 15, 30), Duration::hours(72), Duration::minutes(30));

    assert_eq!(agenda.len(), 3);
    for (i, day) in agenda.iter().enumerate() {
        assert_eq!(day.date, date(1 + i as u32));
        assert!(day.slots.is_empty());
    }
}

#[test]
fn slots_without_pre_or_post_fill() {
    let slot = Duration::minutes(30);
    let greens = vec![
        green(1, 9, 0, 10, 30),
        green(2, 12, 0, 12, 45),
        green(4, 8, 0, 8, 15),
    ];

    let agenda = build_agenda(&greens, at(1, 15, 30), Duration::days(4), slot);
    assert_eq!(agenda.len(), 4);

    assert_eq!(agenda[0].date, date(1));
    let starts: Vec<_> = agenda[0].slots.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(1, 9, 0), at(1, 9, 30), at(1, 10, 0)]);
    assert!(agenda[0].slots.iter().all(|s| s.duration == slot));

    assert_eq!(agenda[1].date, date(2));
    assert_eq!(agenda[1].slots.len(), 1);
    assert_eq!(agenda[1].slots[0].start, at(2, 12, 0));

    assert_eq!(agenda[2].date, date(3));
    assert!(agenda[2].slots.is_empty());

    // 15 minutes of availability: the day is listed with no slots.
    assert_eq!(agenda[3].date, date(4));
    assert!(agenda[3].slots.is_empty());
}

#[test]
fn slots_with_pre_and_post_fill() {
    let slot = Duration::minutes(30);
    let greens = vec![green(3, 9, 0, 9, 30)];

    let agenda = build_agenda(&greens, at(1, 15, 30), Duration::days(4), slot);
    assert_eq!(agenda.len(), 4);

    assert_eq!(agenda[0].date, date(1));
    assert!(agenda[0].slots.is_empty());
    assert_eq!(agenda[1].date, date(2));
    assert!(agenda[1].slots.is_empty());
    assert_eq!(agenda[2].date, date(3));
    assert_eq!(agenda[2].slots.len(), 1);
    assert_eq!(agenda[2].slots[0].start, at(3, 9, 0));
    assert_eq!(agenda[3].date, date(4));
    assert!(agenda[3].slots.is_empty());
}

#[test]
fn several_intervals_on_one_day_accumulate_in_order() {
    let greens = vec![green(1, 9, 0, 10, 0), green(1, 14, 0, 15, 0)];

    let agenda = build_agenda(&greens, at(1, 0, 0), Duration::days(1), Duration::minutes(30));
    assert_eq!(agenda.len(), 1);

    let starts: Vec<_> = agenda[0].slots.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![at(1, 9, 0), at(1, 9, 30), at(1, 14, 0), at(1, 14, 30)]
    );
}

#[test]
fn intervals_outside_the_period_are_ignored() {
    let greens = vec![green(1, 9, 0, 10, 0), green(5, 9, 0, 10, 0)];

    let agenda = build_agenda(&greens, at(2, 0, 0), Duration::days(3), Duration::minutes(30));
    assert_eq!(agenda.len(), 3);
    assert!(agenda.iter().all(|day| day.slots.is_empty()));
}

#[test]
fn slots_do_not_cross_the_interval_end() {
    let greens = vec![green(1, 9, 0, 10, 50)];

    let agenda = build_agenda(&greens, at(1, 0, 0), Duration::days(1), Duration::minutes(25));
    // 110 minutes / 25 = 4 whole slots.
    assert_eq!(agenda[0].slots.len(), 4);
    assert_eq!(agenda[0].slots[3].start, at(1, 10, 15));
}

#[test]
fn agenda_renders_like_the_cli_prints_it() {
    let greens = vec![green(1, 9, 0, 10, 0)];
    let agenda = build_agenda(&greens, at(1, 0, 0), Duration::days(2), Duration::minutes(30));

    assert_eq!(
        agenda[0].to_string(),
        concat!(
            "Agenda:\n  Date: 01.01.2000\n  Slots:\n",
            "  - 2000-01-01T09:00:00+00:00 -> 30m\n",
            "  - 2000-01-01T09:30:00+00:00 -> 30m\n",
        )
    );
    assert_eq!(
        agenda[1].to_string(),
        "Agenda:\n  Date: 02.01.2000\n  Slots: none\n"
    );
}
