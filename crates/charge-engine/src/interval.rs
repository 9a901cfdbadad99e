//! Interval model shared by the overlap test, the merge engine and the agenda builder.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Identifier assigned to an event by the store at creation.
pub type EventId = i64;

/// Event color: available ("green") time or occupied ("red") time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Available,
    Occupied,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Available => "Available",
            Color::Occupied => "Occupied",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Color::Available),
            "Occupied" => Ok(Color::Occupied),
            other => Err(InvalidInput::UnknownColor(other.to_string())),
        }
    }
}

/// End of an event as a time of day, applied to the calendar day of each occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTime {
    pub hour: u32,
    pub minute: u32,
}

impl EndTime {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// The end instant for an occurrence starting at `start`.
    ///
    /// Keeps the calendar day, offset, second and nanosecond of `start`; only the
    /// hour and minute are replaced. Returns `None` when the hour or minute is out
    /// of range.
    pub fn on_day_of(self, start: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        start.with_hour(self.hour)?.with_minute(self.minute)
    }
}

impl From<NaiveTime> for EndTime {
    fn from(t: NaiveTime) -> Self {
        Self::new(t.hour(), t.minute())
    }
}

impl fmt::Display for EndTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One concrete materialization of an event.
///
/// `id` is the source event's id, so every occurrence of a periodic event shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub id: EventId,
    pub color: Color,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Occurrence {
    /// Copy of this occurrence with new bounds; used when the merge engine splits it.
    pub(crate) fn with_bounds(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self { start, end, ..*self }
    }
}

/// Sort occurrences by `(start, end, id)`.
///
/// The trailing keys only matter for identical starts, which would otherwise be
/// left to the order the store happened to return them in.
pub fn sort_occurrences(occurrences: &mut [Occurrence]) {
    occurrences.sort_by_key(|o| (o.start, o.end, o.id));
}
