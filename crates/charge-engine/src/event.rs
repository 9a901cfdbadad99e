//! Persisted event records.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::{Color, EndTime, EventId, Occurrence};
use crate::recurrence::WeeklyRule;

/// Layout used when rendering instants for people.
pub const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A one-off event ending on the same day it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleEvent {
    pub id: EventId,
    pub color: Color,
    pub start: DateTime<FixedOffset>,
    pub end: EndTime,
    pub created_at: DateTime<Utc>,
}

impl SingleEvent {
    /// The event's sole occurrence, or `None` if the stored end time is unusable.
    pub fn occurrence(&self) -> Option<Occurrence> {
        let end = self.end.on_day_of(self.start)?;
        Some(Occurrence {
            id: self.id,
            color: self.color,
            start: self.start,
            end,
        })
    }
}

impl fmt::Display for SingleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SingleEvent:")?;
        writeln!(f, "  Id: {}", self.id)?;
        writeln!(f, "  Type: {}", self.color)?;
        writeln!(f, "  Start: {}", self.start.format(TIME_FMT))?;
        writeln!(f, "  End: {}", self.end)?;
        writeln!(f, "  CreatedAt: {}", self.created_at.format(TIME_FMT))
    }
}

/// An event repeating every week from the rule's anchor, without end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicEvent {
    pub id: EventId,
    pub color: Color,
    pub rule: WeeklyRule,
    pub end: EndTime,
    pub created_at: DateTime<Utc>,
}

impl PeriodicEvent {
    /// Occurrences whose start lies in `[range_start, range_end]`.
    pub fn occurrences(
        &self,
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Vec<Occurrence> {
        self.rule
            .expand(range_start, range_end)
            .into_iter()
            .filter_map(|start| {
                let end = self.end.on_day_of(start)?;
                Some(Occurrence {
                    id: self.id,
                    color: self.color,
                    start,
                    end,
                })
            })
            .collect()
    }
}

impl fmt::Display for PeriodicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PeriodicEvent:")?;
        writeln!(f, "  Id: {}", self.id)?;
        writeln!(f, "  Type: {}", self.color)?;
        writeln!(f, "  RRule: {}", self.rule)?;
        writeln!(f, "  End: {}", self.end)?;
        writeln!(f, "  CreatedAt: {}", self.created_at.format(TIME_FMT))
    }
}
