//! In-process event store.
//!
//! Holds each event's configuration and raw responses, optionally mirrored
//! to a JSON file. The grid engine only ever sees snapshots taken from here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GridError, Result};
use crate::grid::coords::Grid;
use crate::grid::types::{Availability, EventConfig, Responses};

const EVENT_ID_LEN: usize = 8;

/// One stored event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub config: EventConfig,
    #[serde(default)]
    pub responses: Responses,
}

impl StoredEvent {
    pub fn grid(&self) -> Result<Grid> {
        Grid::from_config(&self.config)
    }
}

#[derive(Debug, Default)]
pub struct EventStore {
    events: Mutex<HashMap<String, StoredEvent>>,
    data_file: Option<PathBuf>,
}

fn generate_event_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(EVENT_ID_LEN)
        .map(char::from)
        .collect()
}

impl EventStore {
    /// Store that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store mirrored to `path`; existing contents are loaded
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let events: HashMap<String, StoredEvent> = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            HashMap::new()
        };
        info!(path = %path.display(), events = events.len(), "Event store loaded");
        Ok(Self {
            events: Mutex::new(events),
            data_file: Some(path),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredEvent>> {
        // a poisoned map is still consistent: every write is undone when saving fails
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, events: &HashMap<String, StoredEvent>) -> Result<()> {
        if let Some(path) = &self.data_file {
            let data = serde_json::to_string_pretty(events)?;
            std::fs::write(path, data)?;
        }
        Ok(())
    }

    /// Stores a new event and returns its id
    pub fn create(&self, config: EventConfig) -> Result<String> {
        let mut events = self.lock();
        let mut id = generate_event_id();
        while events.contains_key(&id) {
            id = generate_event_id();
        }
        info!(event_id = %id, name = %config.name, mode = %config.mode, "Event created");
        events.insert(
            id.clone(),
            StoredEvent {
                config,
                responses: Responses::new(),
            },
        );
        if let Err(e) = self.persist(&events) {
            events.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of an event
    pub fn get(&self, id: &str) -> Result<StoredEvent> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))
    }

    /// Saves a respondent's availability, replacing any earlier submission.
    /// Every key must belong to the event's grid; `false` entries are dropped.
    pub fn upsert_response(&self, id: &str, respondent: &str, availability: Availability) -> Result<()> {
        let respondent = respondent.trim();
        if respondent.is_empty() {
            return Err(GridError::InvalidEvent("Respondent name is required".to_string()));
        }

        let mut events = self.lock();
        let event = events
            .get_mut(id)
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))?;

        let grid = event.grid()?;
        for (key, _) in availability.entries() {
            grid.to_coordinates(key)?;
        }

        let availability = availability.compact();
        let slots = availability.len();
        let previous = event.responses.insert(respondent.to_string(), availability);

        if let Err(e) = self.persist(&events) {
            if let Some(event) = events.get_mut(id) {
                match previous {
                    Some(previous) => event.responses.insert(respondent.to_string(), previous),
                    None => event.responses.remove(respondent),
                };
            }
            return Err(e);
        }
        debug!(event_id = %id, respondent, slots, "Response saved");
        Ok(())
    }

    /// Removes a respondent; returns whether they had responded
    pub fn remove_response(&self, id: &str, respondent: &str) -> Result<bool> {
        let mut events = self.lock();
        let event = events
            .get_mut(id)
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))?;
        let Some(removed) = event.responses.remove(respondent) else {
            return Ok(false);
        };

        if let Err(e) = self.persist(&events) {
            if let Some(event) = events.get_mut(id) {
                event.responses.insert(respondent.to_string(), removed);
            }
            return Err(e);
        }
        debug!(event_id = %id, respondent, "Response removed");
        Ok(true)
    }
}
