//! Storage collaborator consumed by the scheduler.
//!
//! Stores are append-only: events are created and read, never updated or removed.

use chrono::{DateTime, FixedOffset};

use crate::error::StoreError;
use crate::event::{PeriodicEvent, SingleEvent};
use crate::interval::EventId;

pub trait EventStore {
    /// Persist a single event and return its newly assigned id. The input `id` is ignored.
    fn create_single_event(&mut self, event: SingleEvent) -> Result<EventId, StoreError>;

    /// Persist a periodic event and return its newly assigned id. The input `id` is ignored.
    fn create_periodic_event(&mut self, event: PeriodicEvent) -> Result<EventId, StoreError>;

    /// `Ok(None)` when no single event has this id.
    fn get_single_event(&self, id: EventId) -> Result<Option<SingleEvent>, StoreError>;

    /// `Ok(None)` when no periodic event has this id.
    fn get_periodic_event(&self, id: EventId) -> Result<Option<PeriodicEvent>, StoreError>;

    /// Single events whose start lies in `[range_start, range_end]`, in no particular order.
    fn get_single_events_within_range(
        &self,
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Result<Vec<SingleEvent>, StoreError>;

    /// Every periodic event, in no particular order.
    fn get_all_periodic_events(&self) -> Result<Vec<PeriodicEvent>, StoreError>;
}

/// Process-local store. Ids start at 1 and are counted separately per event kind.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    single_events: Vec<SingleEvent>,
    periodic_events: Vec<PeriodicEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.single_events.len() + self.periodic_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn next_id(len: usize) -> Result<EventId, StoreError> {
    EventId::try_from(len + 1).map_err(StoreError::new)
}

impl EventStore for MemoryStore {
    fn create_single_event(&mut self, mut event: SingleEvent) -> Result<EventId, StoreError> {
        event.id = next_id(self.single_events.len())?;
        let id = event.id;
        self.single_events.push(event);
        Ok(id)
    }

    fn create_periodic_event(&mut self, mut event: PeriodicEvent) -> Result<EventId, StoreError> {
        event.id = next_id(self.periodic_events.len())?;
        let id = event.id;
        self.periodic_events.push(event);
        Ok(id)
    }

    fn get_single_event(&self, id: EventId) -> Result<Option<SingleEvent>, StoreError> {
        Ok(self.single_events.iter().find(|e| e.id == id).cloned())
    }

    fn get_periodic_event(&self, id: EventId) -> Result<Option<PeriodicEvent>, StoreError> {
        Ok(self.periodic_events.iter().find(|e| e.id == id).cloned())
    }

    fn get_single_events_within_range(
        &self,
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Result<Vec<SingleEvent>, StoreError> {
        Ok(self
            .single_events
            .iter()
            .filter(|e| e.start >= range_start && e.start <= range_end)
            .cloned()
            .collect())
    }

    fn get_all_periodic_events(&self) -> Result<Vec<PeriodicEvent>, StoreError> {
        Ok(self.periodic_events.clone())
    }
}
