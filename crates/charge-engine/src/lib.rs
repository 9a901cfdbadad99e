//! # charge-engine
//!
//! Availability windows and bookable charging slots for a single resource.
//!
//! Events are either Available ("green") or Occupied ("red"), one-off or weekly.
//! Same-color events may never touch; an Occupied event may sit on top of
//! Available time and is subtracted from it when an agenda is computed.
//!
//! ## Modules
//!
//! - [`interval`] — `Occurrence`, `Color`, `EndTime`
//! - [`conflict`] — Overlap test (touching endpoints count)
//! - [`recurrence`] — Weekly rule → concrete occurrence starts
//! - [`merge`] — Subtract occupied occurrences from available ones
//! - [`agenda`] — Merged availability → per-day slot lists
//! - [`scheduler`] — Validated creation and queries over an [`EventStore`]
//! - [`store`] — Storage collaborator trait and an in-memory implementation
//! - [`event`] — Persisted event records
//! - [`error`] — Error types

pub mod agenda;
pub mod conflict;
pub mod error;
pub mod event;
pub mod interval;
pub mod merge;
pub mod recurrence;
pub mod scheduler;
pub mod store;

pub use agenda::{build_agenda, AgendaResult, TimeSlot};
pub use conflict::intersects;
pub use error::{InvalidInput, SchedulerError, StoreError};
pub use event::{PeriodicEvent, SingleEvent};
pub use interval::{Color, EndTime, EventId, Occurrence};
pub use merge::merge_occupancy;
pub use recurrence::WeeklyRule;
pub use scheduler::{Occupancy, Scheduler};
pub use store::{EventStore, MemoryStore};
