//! Error types for scheduler operations.

use thiserror::Error;

use crate::interval::{Color, EventId};

/// Reasons a request is rejected before anything is read or written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("{0}: unset")]
    Unset(&'static str),

    #[error("{field}: must be LTE {max}")]
    OutOfRange { field: &'static str, max: u32 },

    #[error("end time must be after the event start")]
    EndNotAfterStart,

    #[error("{0}: must be GT 0")]
    NonPositive(&'static str),

    #[error("range start must be before range end")]
    InvalidRange,

    #[error("{0}: outside the supported time range")]
    OutOfBounds(&'static str),

    #[error("{field}: must not exceed {max_days} days")]
    TooLong { field: &'static str, max_days: i64 },

    #[error("unknown event color: {0:?} (expected Available or Occupied)")]
    UnknownColor(String),

    /// The candidate event touches or overlaps an existing event of the same color.
    #[error("event intersects with an existing event ({id}: {color})")]
    Overlap { id: EventId, color: Color },
}

/// Opaque failure reported by a storage collaborator.
///
/// The scheduler never inspects these; they are passed through unchanged.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct StoreError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StoreError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self { source: err.into() }
    }
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl SchedulerError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SchedulerError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// A stored weekly rule that cannot be read back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("missing DTSTART in rule {0:?}")]
    MissingStart(String),

    #[error("invalid DTSTART {value:?}: {reason}")]
    InvalidStart { value: String, reason: String },

    #[error("unsupported recurrence {0:?} (only FREQ=WEEKLY is supported)")]
    UnsupportedFrequency(String),
}
