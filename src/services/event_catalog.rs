//! Event catalog: named programs with default start/end times

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    countdown::mask_time_input,
    error::{CatalogError, CatalogResult},
};

/// A scheduled program the operator can pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_end_time: Option<String>,
}

/// Fields for a new event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub default_start_time: Option<String>,
    #[serde(default)]
    pub default_end_time: Option<String>,
}

/// Partial update of an existing event. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_start_time: Option<String>,
    #[serde(default)]
    pub default_end_time: Option<String>,
}

/// The full catalog as it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCatalog {
    events: Vec<Event>,
    #[serde(default)]
    current_event_id: Option<String>,
}

/// Built-in events used when no catalog file exists yet
pub fn default_events() -> Vec<Event> {
    let preset = |id: &str, name: &str, start: &str, end: &str| Event {
        id: id.to_string(),
        name: name.to_string(),
        default_start_time: Some(start.to_string()),
        default_end_time: Some(end.to_string()),
    };

    vec![
        preset("al1", "AL 1", "06:00:00", "07:00:00"),
        preset("al2", "AL 2", "12:00:00", "12:30:00"),
        preset("gazeta-esporte", "Gazeta Esporte", "18:00:00", "18:45:00"),
    ]
}

/// Normalise an optional time field: masked, and empty means unset
fn clean_time(value: Option<String>) -> Option<String> {
    value
        .map(|raw| mask_time_input(&raw))
        .filter(|masked| !masked.is_empty())
}

/// Apply the same rules `add` enforces to a whole list: trimmed non-empty
/// names, masked times, and no repeated ids or names
fn normalize_events(events: Vec<Event>) -> Result<Vec<Event>, String> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    events
        .into_iter()
        .map(|event| {
            let name = event.name.trim().to_string();
            if name.is_empty() {
                return Err(format!("event '{}' has an empty name", event.id));
            }
            if event.id.is_empty() || !ids.insert(event.id.clone()) {
                return Err(format!("duplicate or empty id '{}'", event.id));
            }
            if !names.insert(name.clone()) {
                return Err(format!("duplicate name '{}'", name));
            }
            Ok(Event {
                id: event.id,
                name,
                default_start_time: clean_time(event.default_start_time),
                default_end_time: clean_time(event.default_end_time),
            })
        })
        .collect()
}

impl EventCatalog {
    /// Build a catalog; the first event becomes current
    pub fn new(events: Vec<Event>) -> Self {
        let current_event_id = events.first().map(|e| e.id.clone());
        Self {
            events,
            current_event_id,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_event_id.as_deref()
    }

    pub fn current(&self) -> Option<&Event> {
        self.current_event_id
            .as_deref()
            .and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// True if no event other than `exclude_id` carries `name`
    pub fn is_name_unique(&self, name: &str, exclude_id: Option<&str>) -> bool {
        !self
            .events
            .iter()
            .any(|e| e.name == name && Some(e.id.as_str()) != exclude_id)
    }

    fn validate_name(&self, name: &str, exclude_id: Option<&str>) -> CatalogResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !self.is_name_unique(name, exclude_id) {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    fn next_id(&self) -> String {
        let base = format!("event-{}", Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut suffix = 1;
        while self.get(&id).is_some() {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        id
    }

    /// Append a new event
    pub fn add(&mut self, new_event: NewEvent) -> CatalogResult<Event> {
        let name = self.validate_name(&new_event.name, None)?;
        let event = Event {
            id: self.next_id(),
            name,
            default_start_time: clean_time(new_event.default_start_time),
            default_end_time: clean_time(new_event.default_end_time),
        };

        info!("Adding event '{}' ({})", event.name, event.id);
        self.events.push(event.clone());
        if self.current_event_id.is_none() {
            self.current_event_id = Some(event.id.clone());
        }
        Ok(event)
    }

    /// Apply a partial update
    pub fn update(&mut self, id: &str, patch: EventPatch) -> CatalogResult<Event> {
        let name = match patch.name {
            Some(name) => Some(self.validate_name(&name, Some(id))?),
            None => None,
        };

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if let Some(name) = name {
            event.name = name;
        }
        if patch.default_start_time.is_some() {
            event.default_start_time = clean_time(patch.default_start_time);
        }
        if patch.default_end_time.is_some() {
            event.default_end_time = clean_time(patch.default_end_time);
        }

        info!("Updated event '{}' ({})", event.name, event.id);
        Ok(event.clone())
    }

    /// Remove an event. If it was current, the first remaining event takes over.
    pub fn delete(&mut self, id: &str) -> CatalogResult<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        let removed = self.events.remove(index);
        if self.current_event_id.as_deref() == Some(id) {
            self.current_event_id = self.events.first().map(|e| e.id.clone());
        }

        info!("Deleted event '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Make an event current
    pub fn select(&mut self, id: &str) -> CatalogResult<Event> {
        let event = self
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        self.current_event_id = Some(event.id.clone());
        Ok(event)
    }

    /// Pretty JSON array of all events
    pub fn export_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }

    /// Replace all events from a JSON array. The catalog is untouched on failure.
    pub fn import_json(&mut self, text: &str) -> CatalogResult<usize> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| CatalogError::InvalidImport(e.to_string()))?;
        if !value.is_array() {
            return Err(CatalogError::InvalidImport(
                "expected a JSON array of events".to_string(),
            ));
        }
        let events: Vec<Event> = serde_json::from_value(value)
            .map_err(|e| CatalogError::InvalidImport(e.to_string()))?;
        let events = normalize_events(events).map_err(CatalogError::InvalidImport)?;

        let keep_current = self
            .current_event_id
            .as_deref()
            .is_some_and(|id| events.iter().any(|e| e.id == id));
        if !keep_current {
            self.current_event_id = events.first().map(|e| e.id.clone());
        }
        self.events = events;

        info!("Imported {} events", self.events.len());
        Ok(self.events.len())
    }

    /// Check and normalise a catalog read from disk. A dangling current id
    /// falls back to the first event.
    pub fn normalized(self) -> CatalogResult<Self> {
        let events = normalize_events(self.events).map_err(CatalogError::InvalidCatalog)?;
        let current_event_id = self
            .current_event_id
            .filter(|id| events.iter().any(|e| &e.id == id))
            .or_else(|| events.first().map(|e| e.id.clone()));
        Ok(Self {
            events,
            current_event_id,
        })
    }

    /// Put the events in the order of `ids`, which must name every event exactly once
    pub fn reorder(&mut self, ids: &[String]) -> CatalogResult<()> {
        let unique: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if ids.len() != self.events.len() || unique.len() != ids.len() {
            return Err(CatalogError::InvalidOrder(format!(
                "expected each of the {} event ids exactly once",
                self.events.len()
            )));
        }

        let mut reordered = Vec::with_capacity(self.events.len());
        for id in ids {
            let event = self
                .get(id)
                .cloned()
                .ok_or_else(|| CatalogError::InvalidOrder(format!("unknown event id '{}'", id)))?;
            reordered.push(event);
        }

        self.events = reordered;
        info!("Reordered {} events", self.events.len());
        Ok(())
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new(default_events())
    }
}
