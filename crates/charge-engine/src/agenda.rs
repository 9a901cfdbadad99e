//! Turn merged available time into per-day lists of bookable slots.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::event::TIME_FMT;
use crate::interval::Occurrence;

/// A bookable window of fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub duration: Duration,
}

/// Slots available on one calendar day. `slots` is empty when nothing fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaResult {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

impl fmt::Display for AgendaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Agenda:")?;
        writeln!(f, "  Date: {}", self.date.format("%d.%m.%Y"))?;
        if self.slots.is_empty() {
            return writeln!(f, "  Slots: none");
        }
        writeln!(f, "  Slots:")?;
        for slot in &self.slots {
            writeln!(
                f,
                "  - {} -> {}",
                slot.start.format(TIME_FMT),
                format_duration(slot.duration)
            )?;
        }
        Ok(())
    }
}

/// Render a duration as `1h30m`, `45m`, `10s`; zero renders as `0s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);

    let mut out = String::from(sign);
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 || (hours == 0 && minutes == 0) {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

/// Number of calendar days an agenda over `period` covers: `ceil(period / 24h)`.
fn day_count(period: Duration) -> usize {
    if period <= Duration::zero() {
        return 0;
    }
    let whole = period.num_days();
    let days = if period > Duration::days(whole) {
        whole + 1
    } else {
        whole
    };
    usize::try_from(days).unwrap_or(usize::MAX)
}

/// Back-to-back slots of `slot` length that fit in `[start, end]`, from `start`.
fn slots_within(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    slot: Duration,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if slot <= Duration::zero() {
        return slots;
    }

    let mut cursor = start;
    while let Some(slot_end) = cursor.checked_add_signed(slot) {
        if slot_end > end {
            break;
        }
        slots.push(TimeSlot {
            start: cursor,
            duration: slot,
        });
        cursor = slot_end;
    }
    slots
}

/// Build one [`AgendaResult`] per calendar day of the period.
///
/// Days run from `period_start`'s date for `ceil(period_dur / 24h)` days, in
/// `period_start`'s offset. Each merged interval lands on the day its start
/// falls on and contributes `floor(len / slot_dur)` slots; intervals starting
/// outside those days are ignored. Days with nothing bookable are still listed.
///
/// `merged` must be sorted by start, as returned by
/// [`crate::merge::merge_occupancy`].
pub fn build_agenda(
    merged: &[Occurrence],
    period_start: DateTime<FixedOffset>,
    period_dur: Duration,
    slot_dur: Duration,
) -> Vec<AgendaResult> {
    let offset = *period_start.offset();
    let first_day = period_start.date_naive();

    let mut agenda: Vec<AgendaResult> = first_day
        .iter_days()
        .take(day_count(period_dur))
        .map(|date| AgendaResult {
            date,
            slots: Vec::new(),
        })
        .collect();

    for interval in merged {
        let start = interval.start.with_timezone(&offset);
        let end = interval.end.with_timezone(&offset);

        let Ok(day) = usize::try_from((start.date_naive() - first_day).num_days()) else {
            continue;
        };
        let Some(entry) = agenda.get_mut(day) else {
            continue;
        };
        entry.slots.extend(slots_within(start, end, slot_dur));
    }

    agenda
}
