//! Event store persisted as a single JSON document on disk.
//!
//! The whole document is loaded on open and rewritten on every create. Writes go
//! to a temporary file in the same directory which is then renamed over the
//! database, so readers never observe a half-written file. There is no locking
//! between processes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use charge_engine::{EventId, EventStore, PeriodicEvent, SingleEvent, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    next_single_id: EventId,
    next_periodic_id: EventId,
    single_events: Vec<SingleEvent>,
    periodic_events: Vec<PeriodicEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            next_single_id: 1,
            next_periodic_id: 1,
            single_events: Vec::new(),
            periodic_events: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Document,
}

impl JsonFileStore {
    /// Load the database at `path`. A missing file is an empty database.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let doc = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::new)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(StoreError::new(e)),
        };
        debug!(
            path = %path.display(),
            single = doc.single_events.len(),
            periodic = doc.periodic_events.len(),
            "database loaded"
        );

        Ok(Self { path, doc })
    }

    /// Write `doc` to disk and adopt it only once the rename succeeded.
    fn commit(&mut self, doc: Document) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(StoreError::new)?;
        serde_json::to_writer_pretty(&mut tmp, &doc).map_err(StoreError::new)?;
        tmp.flush().map_err(StoreError::new)?;
        tmp.as_file().sync_all().map_err(StoreError::new)?;
        tmp.persist(&self.path).map_err(|e| StoreError::new(e.error))?;

        self.doc = doc;
        Ok(())
    }
}

fn bump(next: &mut EventId) -> Result<EventId, StoreError> {
    let id = *next;
    *next = id
        .checked_add(1)
        .ok_or_else(|| StoreError::new("event id space exhausted"))?;
    Ok(id)
}

impl EventStore for JsonFileStore {
    fn create_single_event(&mut self, mut event: SingleEvent) -> Result<EventId, StoreError> {
        let mut doc = self.doc.clone();
        event.id = bump(&mut doc.next_single_id)?;
        let id = event.id;
        doc.single_events.push(event);
        self.commit(doc)?;
        Ok(id)
    }

    fn create_periodic_event(&mut self, mut event: PeriodicEvent) -> Result<EventId, StoreError> {
        let mut doc = self.doc.clone();
        event.id = bump(&mut doc.next_periodic_id)?;
        let id = event.id;
        doc.periodic_events.push(event);
        self.commit(doc)?;
        Ok(id)
    }

    fn get_single_event(&self, id: EventId) -> Result<Option<SingleEvent>, StoreError> {
        Ok(self.doc.single_events.iter().find(|e| e.id == id).cloned())
    }

    fn get_periodic_event(&self, id: EventId) -> Result<Option<PeriodicEvent>, StoreError> {
        Ok(self.doc.periodic_events.iter().find(|e| e.id == id).cloned())
    }

    fn get_single_events_within_range(
        &self,
        range_start: DateTime<FixedOffset>,
        range_end: DateTime<FixedOffset>,
    ) -> Result<Vec<SingleEvent>, StoreError> {
        Ok(self
            .doc
            .single_events
            .iter()
            .filter(|e| e.start >= range_start && e.start <= range_end)
            .cloned()
            .collect())
    }

    fn get_all_periodic_events(&self) -> Result<Vec<PeriodicEvent>, StoreError> {
        Ok(self.doc.periodic_events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charge_engine::{Color, EndTime, WeeklyRule};
    use chrono::{TimeZone, Utc};

    fn single(day: u32) -> SingleEvent {
        SingleEvent {
            id: 0,
            color: Color::Available,
            start: Utc.with_ymd_and_hms(2000, 1, day, 9, 0, 0).unwrap().fixed_offset(),
            end: EndTime::new(10, 0),
            created_at: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get_all_periodic_events().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn events_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.create_single_event(single(10)).unwrap(), 1);
        assert_eq!(store.create_single_event(single(11)).unwrap(), 2);
        let anchor = Utc.with_ymd_and_hms(2000, 1, 9, 12, 0, 0).unwrap().fixed_offset();
        let periodic = PeriodicEvent {
            id: 0,
            color: Color::Occupied,
            rule: WeeklyRule::new(anchor),
            end: EndTime::new(13, 0),
            created_at: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        };
        assert_eq!(store.create_periodic_event(periodic).unwrap(), 1);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_single_event(2).unwrap(),
            Some(SingleEvent { id: 2, ..single(11) })
        );
        let stored = reopened.get_periodic_event(1).unwrap().unwrap();
        assert_eq!(stored.rule.anchor, anchor);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["next_single_id"], 3);
        assert_eq!(raw["next_periodic_id"], 2);
        assert_eq!(
            raw["periodic_events"][0]["rule"],
            "DTSTART:2000-01-09T12:00:00+00:00;FREQ=WEEKLY"
        );
    }

    #[test]
    fn range_query_is_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("db.json")).unwrap();
        store.create_single_event(single(10)).unwrap();
        let at = single(10).start;

        assert_eq!(store.get_single_events_within_range(at, at).unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}
