//! Scheduler service: validated event creation and availability queries.
//!
//! Every call reads raw events from the store and recomputes occurrences; nothing
//! is cached between calls. A create is check-then-write: all conflict checks run
//! before the single store call, so a rejected create leaves the store untouched.
//! The sequence is not atomic against other writers sharing the same storage.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::{debug, info, warn};

use crate::agenda::{build_agenda, AgendaResult};
use crate::conflict::find_conflict;
use crate::error::{InvalidInput, Result};
use crate::event::{PeriodicEvent, SingleEvent};
use crate::interval::{sort_occurrences, Color, EndTime, EventId, Occurrence};
use crate::merge::merge_occupancy;
use crate::recurrence::WeeklyRule;
use crate::store::EventStore;

/// Guard band around every lookup window.
fn guard_band() -> Duration {
    Duration::days(1)
}

fn recurrence_period() -> Duration {
    Duration::weeks(1)
}

/// Longest period an agenda may cover.
pub const MAX_AGENDA_DAYS: i64 = 366;

/// Timestamp meaning "not set". No event can start here: its lookup window
/// would begin before the earliest representable instant.
pub const UNSET: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

pub fn is_unset(ts: DateTime<FixedOffset>) -> bool {
    ts == UNSET
}

/// `[from - before, to + after]`, or `OutOfBounds(field)` when either bound is unrepresentable.
fn lookup_window(
    field: &'static str,
    from: DateTime<FixedOffset>,
    before: Duration,
    to: DateTime<FixedOffset>,
    after: Duration,
) -> std::result::Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), InvalidInput> {
    let start = from.checked_sub_signed(before);
    let end = to.checked_add_signed(after);
    start.zip(end).ok_or(InvalidInput::OutOfBounds(field))
}

/// Occurrences within a range, split by color and sorted by `(start, end, id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub available: Vec<Occurrence>,
    pub occupied: Vec<Occurrence>,
}

impl Occupancy {
    fn of_color(&self, color: Color) -> &[Occurrence] {
        match color {
            Color::Available => &self.available,
            Color::Occupied => &self.occupied,
        }
    }
}

#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
}

impl<S: EventStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a one-off event that must not touch any existing event of the same color.
    ///
    /// # Errors
    /// `InvalidInput` for a bad start/end or an overlap; storage failures are passed through.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn add_single_event(
        &mut self,
        color: Color,
        start: DateTime<FixedOffset>,
        end: EndTime,
    ) -> Result<EventId> {
        let end_at = validate_event_input(start, end)?;

        let candidate = Occurrence {
            id: 0,
            color,
            start,
            end: end_at,
        };
        let (range_start, range_end) =
            lookup_window("eventStart", start, guard_band(), end_at, guard_band())?;
        self.ensure_no_conflict(color, &[candidate], range_start, range_end)?;

        let event = SingleEvent {
            id: 0,
            color,
            start,
            end,
            created_at: Utc::now(),
        };
        let id = self.store.create_single_event(event)?;
        info!(
            event.id = id,
            event.color = %color,
            event.kind = "single",
            %start,
            %end,
            "event created"
        );

        Ok(id)
    }

    /// Create a weekly event anchored at `start`.
    ///
    /// Checked against existing same-color occurrences over one full week plus the
    /// guard band on each side, which covers every weekday/time combination it
    /// will ever occupy.
    ///
    /// # Errors
    /// `InvalidInput` for a bad start/end or an overlap; storage failures are passed through.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn add_periodic_event(
        &mut self,
        color: Color,
        start: DateTime<FixedOffset>,
        end: EndTime,
    ) -> Result<EventId> {
        let end_at = validate_event_input(start, end)?;

        let event = PeriodicEvent {
            id: 0,
            color,
            rule: WeeklyRule::new(start),
            end,
            created_at: Utc::now(),
        };
        let (range_start, range_end) = lookup_window(
            "eventStart",
            start,
            guard_band(),
            end_at,
            recurrence_period() + guard_band(),
        )?;
        let candidates = event.occurrences(range_start, range_end);
        self.ensure_no_conflict(color, &candidates, range_start, range_end)?;

        let id = self.store.create_periodic_event(event)?;
        info!(
            event.id = id,
            event.color = %color,
            event.kind = "periodic",
            %start,
            %end,
            "event created"
        );

        Ok(id)
    }

    /// Bookable slots of `slot_dur` for each day of `[period_start, period_start + period_dur)`.
    ///
    /// # Errors
    /// `InvalidInput` when `period_start` is unset, either duration is not positive,
    /// the period exceeds [`MAX_AGENDA_DAYS`] or its window leaves the representable range.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn get_available_agenda(
        &self,
        period_start: DateTime<FixedOffset>,
        period_dur: Duration,
        slot_dur: Duration,
    ) -> Result<Vec<AgendaResult>> {
        if is_unset(period_start) {
            return Err(InvalidInput::Unset("periodStart").into());
        }
        if period_dur <= Duration::zero() {
            return Err(InvalidInput::NonPositive("periodDur").into());
        }
        if slot_dur <= Duration::zero() {
            return Err(InvalidInput::NonPositive("desiredDur").into());
        }
        if period_dur > Duration::days(MAX_AGENDA_DAYS) {
            return Err(InvalidInput::TooLong {
                field: "periodDur",
                max_days: MAX_AGENDA_DAYS,
            }
            .into());
        }

        let period_end = period_start
            .checked_add_signed(period_dur)
            .ok_or(InvalidInput::OutOfBounds("periodDur"))?;
        let (range_start, range_end) =
            lookup_window("periodStart", period_start, guard_band(), period_end, guard_band())?;
        let occupancy = self.occurrences_within(range_start, range_end)?;

        let merged = merge_occupancy(&occupancy.available, &occupancy.occupied);
        debug!(
            available = occupancy.available.len(),
            occupied = occupancy.occupied.len(),
            merged = merged.len(),
            "occupancy merged"
        );

        Ok(build_agenda(&merged, period_start, period_dur, slot_dur))
    }

    /// Single events starting within `[period_start, period_end]` and every periodic event.
    ///
    /// # Errors
    /// `InvalidInput` when a bound is unset or `period_start >= period_end`.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn get_events(
        &self,
        period_start: DateTime<FixedOffset>,
        period_end: DateTime<FixedOffset>,
    ) -> Result<(Vec<SingleEvent>, Vec<PeriodicEvent>)> {
        if is_unset(period_start) {
            return Err(InvalidInput::Unset("periodStart").into());
        }
        if is_unset(period_end) {
            return Err(InvalidInput::Unset("periodEnd").into());
        }
        if period_start >= period_end {
            return Err(InvalidInput::InvalidRange.into());
        }

        let mut single = self
            .store
            .get_single_events_within_range(period_start, period_end)?;
        single.sort_by_key(|e| (e.start, e.id));
        let mut periodic = self.store.get_all_periodic_events()?;
        periodic.sort_by_key(|e| e.id);

        Ok((single, periodic))
    }

    pub fn get_single_event(&self, id: EventId) -> Result<Option<SingleEvent>> {
        Ok(self.store.get_single_event(id)?)
    }

    pub fn get_periodic_event(&self, id: EventId) -> Result<Option<PeriodicEvent>> {
        Ok(self.store.get_periodic_event(id)?)
    }

    /// Materialize every stored event into occurrences starting in `[range_start, range_end]`.
    pub fn occurrences_within(
        &self,
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Result<Occupancy> {
        let singles = self
            .store
            .get_single_events_within_range(range_start, range_end)?;
        let periodics = self.store.get_all_periodic_events()?;

        let mut occurrences: Vec<Occurrence> = Vec::new();
        for event in &singles {
            match event.occurrence() {
                Some(o) => occurrences.push(o),
                None => warn!(
                    event.id = event.id,
                    end = %event.end,
                    "skipping single event with unusable end time"
                ),
            }
        }
        for event in &periodics {
            occurrences.extend(event.occurrences(range_start, range_end));
        }
        sort_occurrences(&mut occurrences);

        let (available, occupied): (Vec<_>, Vec<_>) = occurrences
            .into_iter()
            .partition(|o| o.color == Color::Available);

        Ok(Occupancy {
            available,
            occupied,
        })
    }

    fn ensure_no_conflict(
        &self,
        color: Color,
        candidates: &[Occurrence],
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Result<()> {
        let occupancy = self.occurrences_within(range_start, range_end)?;
        let existing = occupancy.of_color(color);
        debug!(candidates = candidates.len(), existing = existing.len(), "checking for overlaps");

        if let Some(hit) = find_conflict(candidates, existing) {
            warn!(
            conflict.id = hit.id,
            conflict.color = %hit.color,
            conflict.start = %hit.start,
            "event rejected: overlap"
        );
            return Err(InvalidInput::Overlap {
                id: hit.id,
                color: hit.color,
            }
            .into());
        }

        Ok(())
    }
}

/// Check the time fields shared by both event kinds and return the first occurrence's end.
fn validate_event_input(
    start: DateTime<FixedOffset>,
    end: EndTime,
) -> std::result::Result<DateTime<FixedOffset>, InvalidInput> {
    if is_unset(start) {
        return Err(InvalidInput::Unset("eventStart"));
    }
    if end.hour > 23 {
        return Err(InvalidInput::OutOfRange {
            field: "endDayHours",
            max: 23,
        });
    }
    if end.minute > 59 {
        return Err(InvalidInput::OutOfRange {
            field: "endDayMinutes",
            max: 59,
        });
    }

    match end.on_day_of(start) {
        Some(end_at) if end_at > start => Ok(end_at),
        _ => Err(InvalidInput::EndNotAfterStart),
    }
}
