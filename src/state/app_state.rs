//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    countdown::{evaluate, mask_time_input, Clock},
    error::StateError,
    services::{CatalogStore, Event, EventCatalog, EventPatch, NewEvent},
};
use super::{CountdownInputs, CountdownSnapshot};

/// Shared state behind the HTTP API and the clock ticker
#[derive(Debug)]
pub struct AppState {
    /// Start/end boundaries and the latest clock sample, always updated together
    pub countdown: Arc<Mutex<CountdownInputs>>,
    /// Wall-clock source sampled on every tick
    clock: Arc<dyn Clock>,
    /// Operator's event list and the current selection
    pub catalog: Arc<Mutex<EventCatalog>>,
    store: Option<CatalogStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest snapshot for displays
    pub snapshot_tx: watch::Sender<CountdownSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<CountdownSnapshot>,
}

impl AppState {
    /// Create the state, seeding start/end from the current event's defaults
    pub fn new(
        port: u16,
        host: String,
        clock: Arc<dyn Clock>,
        catalog: EventCatalog,
        store: Option<CatalogStore>,
    ) -> Self {
        let (start_time, end_time) = catalog
            .current()
            .map(|event| {
                (
                    event.default_start_time.clone().unwrap_or_default(),
                    event.default_end_time.clone().unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        let inputs = CountdownInputs::new(start_time, end_time, clock.seconds_since_midnight());
        let (snapshot_tx, snapshot_rx) = watch::channel(inputs.snapshot());

        Self {
            countdown: Arc::new(Mutex::new(inputs)),
            clock,
            catalog: Arc::new(Mutex::new(catalog)),
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Update the countdown inputs under one lock and publish the result
    fn update_countdown<F>(&self, updater: F) -> Result<CountdownSnapshot, StateError>
    where
        F: FnOnce(&mut CountdownInputs) -> Result<(), StateError>,
    {
        let mut inputs = self.countdown.lock()
            .map_err(|_| StateError::Lock("countdown"))?;

        let previous_phase =
            evaluate(&inputs.start_time, &inputs.end_time, inputs.current_seconds).phase;
        updater(&mut *inputs)?;
        let snapshot = inputs.snapshot();
        drop(inputs);

        if previous_phase != snapshot.phase {
            debug!("Countdown phase changed to {:?}", snapshot.phase);
        }

        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to publish countdown snapshot: {}", e);
        }

        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Re-sample the clock and recompute (called once per second by the ticker)
    pub fn tick(&self) -> Result<CountdownSnapshot, StateError> {
        let seconds = self.clock.seconds_since_midnight();
        let snapshot = self.update_countdown(|inputs| {
            inputs.current_seconds = seconds;
            Ok(())
        })?;
        debug!(
            "Tick {}: remaining={} overflow={} variant={:?}",
            snapshot.local_time, snapshot.remaining_time, snapshot.overflow_time, snapshot.variant
        );
        Ok(snapshot)
    }

    /// Re-sample the clock right away. Start/end are left alone.
    pub fn reset(&self) -> Result<CountdownSnapshot, StateError> {
        let seconds = self.clock.seconds_since_midnight();
        info!("Countdown reset, clock re-sampled");
        self.record_action("reset");
        self.update_countdown(|inputs| {
            inputs.current_seconds = seconds;
            Ok(())
        })
    }

    /// Set start and/or end time from operator input.
    ///
    /// Input is masked first. A manual end time is refused until the event has
    /// started (judged with the new start time, if one is given).
    pub fn set_times(
        &self,
        start_time: Option<String>,
        end_time: Option<String>,
    ) -> Result<CountdownSnapshot, StateError> {
        let snapshot = self.write_times(start_time, end_time, true)?;
        info!(
            "Times set: start='{}' end='{}'",
            snapshot.start_time, snapshot.end_time
        );
        self.record_action("set-times");
        Ok(snapshot)
    }

    /// Set start and/or end time without the end-time lock (startup configuration)
    pub fn configure_times(
        &self,
        start_time: Option<String>,
        end_time: Option<String>,
    ) -> Result<CountdownSnapshot, StateError> {
        self.write_times(start_time, end_time, false)
    }

    fn write_times(
        &self,
        start_time: Option<String>,
        end_time: Option<String>,
        lock_end_until_started: bool,
    ) -> Result<CountdownSnapshot, StateError> {
        let start_time = start_time.map(|raw| mask_time_input(&raw));
        let end_time = end_time.map(|raw| mask_time_input(&raw));

        self.update_countdown(|inputs| {
            let mut next = inputs.clone();
            if let Some(start) = start_time {
                next.start_time = start;
            }
            if let Some(end) = end_time {
                if lock_end_until_started && !next.snapshot().end_time_editable {
                    return Err(StateError::EndTimeLocked);
                }
                next.end_time = end;
            }
            *inputs = next;
            Ok(())
        })
    }

    /// Copy an event's default times into the countdown. Missing or empty
    /// defaults keep the current value.
    fn apply_defaults(&self, event: &Event) -> Result<CountdownSnapshot, StateError> {
        debug!("Applying defaults of '{}'", event.name);
        let start = event.default_start_time.as_deref().filter(|t| !t.is_empty());
        let end = event.default_end_time.as_deref().filter(|t| !t.is_empty());
        self.update_countdown(|inputs| {
            if let Some(start) = start {
                inputs.start_time = start.to_string();
            }
            if let Some(end) = end {
                inputs.end_time = end.to_string();
            }
            Ok(())
        })
    }

    /// Current snapshot
    pub fn get_snapshot(&self) -> Result<CountdownSnapshot, StateError> {
        self.countdown.lock()
            .map(|inputs| inputs.snapshot())
            .map_err(|_| StateError::Lock("countdown"))
    }

    fn lock_catalog(&self) -> Result<std::sync::MutexGuard<'_, EventCatalog>, StateError> {
        self.catalog.lock().map_err(|_| StateError::Lock("catalog"))
    }

    fn persist(&self, catalog: &EventCatalog) -> Result<(), StateError> {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(catalog) {
                error!("Failed to save catalog to {}: {}", store.path().display(), e);
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Run a catalog mutation on a copy, persist the copy, and only then swap
    /// it in. Re-applies defaults if the current event changed as a result.
    fn mutate_catalog<T, F>(&self, action: &str, mutation: F) -> Result<T, StateError>
    where
        F: FnOnce(&mut EventCatalog) -> Result<T, StateError>,
    {
        let mut catalog = self.lock_catalog()?;
        let before = catalog.current().cloned();

        let mut next = catalog.clone();
        let result = mutation(&mut next)?;
        self.persist(&next)?;

        let after = next.current().cloned();
        *catalog = next;
        drop(catalog);

        self.record_action(action);
        if after != before {
            if let Some(event) = after {
                self.apply_defaults(&event)?;
            }
        }
        Ok(result)
    }

    /// All events and the current selection
    pub fn list_events(&self) -> Result<(Vec<Event>, Option<String>), StateError> {
        let catalog = self.lock_catalog()?;
        Ok((
            catalog.events().to_vec(),
            catalog.current_id().map(str::to_string),
        ))
    }

    pub fn current_event(&self) -> Result<Option<Event>, StateError> {
        Ok(self.lock_catalog()?.current().cloned())
    }

    pub fn add_event(&self, new_event: NewEvent) -> Result<Event, StateError> {
        self.mutate_catalog("add-event", |catalog| Ok(catalog.add(new_event)?))
    }

    pub fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event, StateError> {
        self.mutate_catalog("update-event", |catalog| Ok(catalog.update(id, patch)?))
    }

    pub fn delete_event(&self, id: &str) -> Result<Event, StateError> {
        self.mutate_catalog("delete-event", |catalog| Ok(catalog.delete(id)?))
    }

    /// Make an event current and load its default times
    pub fn select_event(&self, id: &str) -> Result<CountdownSnapshot, StateError> {
        let event = self.mutate_catalog("select-event", |catalog| Ok(catalog.select(id)?))?;
        info!("Selected event '{}'", event.name);
        // Reselecting the current event still reloads its defaults
        self.apply_defaults(&event)
    }

    /// Put the current event's default times back and re-sample the clock
    pub fn reset_to_defaults(&self) -> Result<CountdownSnapshot, StateError> {
        if let Some(event) = self.current_event()? {
            info!("Resetting countdown to defaults of '{}'", event.name);
            self.apply_defaults(&event)?;
        } else {
            warn!("Reset to defaults requested with no current event");
        }
        self.record_action("reset-defaults");
        self.reset()
    }

    pub fn export_events(&self) -> Result<String, StateError> {
        Ok(self.lock_catalog()?.export_json()?)
    }

    pub fn import_events(&self, text: &str) -> Result<usize, StateError> {
        self.mutate_catalog("import-events", |catalog| Ok(catalog.import_json(text)?))
    }

    /// Put the events in the given id order
    pub fn reorder_events(&self, ids: &[String]) -> Result<Vec<Event>, StateError> {
        self.mutate_catalog("reorder-events", |catalog| {
            catalog.reorder(ids)?;
            Ok(catalog.events().to_vec())
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        countdown::{ManualClock, Phase},
        error::CatalogError,
    };

    fn state_at(seconds: u64) -> (Arc<ManualClock>, AppState) {
        let clock = Arc::new(ManualClock::new(seconds));
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            clock.clone(),
            EventCatalog::default(),
            None,
        );
        (clock, state)
    }

    #[test]
    fn test_new_uses_current_event_defaults() {
        let (_clock, state) = state_at(5 * 3600);
        let snap = state.get_snapshot().unwrap();
        assert_eq!(snap.start_time, "06:00:00");
        assert_eq!(snap.end_time, "07:00:00");
        assert_eq!(snap.phase, Phase::ToStart);
        assert_eq!(snap.remaining_time, "01:00:00");
    }

    #[test]
    fn test_tick_follows_clock_and_publishes() {
        let (clock, state) = state_at(6 * 3600 - 1);
        let rx = state.snapshot_tx.subscribe();

        clock.advance(1);
        let snap = state.tick().unwrap();
        assert!(snap.has_started);
        assert_eq!(snap.remaining_time, "01:00:00");
        assert_eq!(*rx.borrow(), snap);
    }

    #[test]
    fn test_reset_twice_same_second_is_identical() {
        let (_clock, state) = state_at(40_000);
        let first = state.reset().unwrap();
        let second = state.reset().unwrap();
        assert_eq!(first.current_seconds, second.current_seconds);
        assert_eq!(state.get_last_action().0.as_deref(), Some("reset"));
    }

    #[test]
    fn test_end_time_locked_before_start() {
        let (_clock, state) = state_at(5 * 3600);
        assert!(matches!(
            state.set_times(None, Some("08:00:00".into())),
            Err(StateError::EndTimeLocked)
        ));

        // Moving the start into the past in the same request unlocks it.
        let snap = state
            .set_times(Some("040000".into()), Some("08:00:00".into()))
            .unwrap();
        assert_eq!(snap.start_time, "04:00:00");
        assert_eq!(snap.end_time, "08:00:00");
        assert_eq!(snap.phase, Phase::ToEnd);
    }

    #[test]
    fn test_configure_times_skips_end_lock() {
        let (_clock, state) = state_at(5 * 3600);
        let snap = state.configure_times(None, Some("08:00:00".into())).unwrap();
        assert_eq!(snap.end_time, "08:00:00");
        assert!(!snap.has_started);
    }

    #[test]
    fn test_select_event_loads_defaults() {
        let (_clock, state) = state_at(18 * 3600 + 50 * 60);
        let snap = state.select_event("gazeta-esporte").unwrap();
        assert_eq!(snap.start_time, "18:00:00");
        assert_eq!(snap.end_time, "18:45:00");
        assert!(snap.is_overflow);
        assert_eq!(snap.overflow_time, "00:05:00");
    }

    #[test]
    fn test_reset_to_defaults_restores_times() {
        let (_clock, state) = state_at(6 * 3600 + 10);
        state.set_times(Some("05:00:00".into()), Some("09:00:00".into())).unwrap();

        let snap = state.reset_to_defaults().unwrap();
        assert_eq!(snap.start_time, "06:00:00");
        assert_eq!(snap.end_time, "07:00:00");
        assert_eq!(snap.remaining_time, "00:59:50");
    }

    #[test]
    fn test_updating_current_event_reapplies_defaults() {
        let (_clock, state) = state_at(0);
        let patch = EventPatch {
            default_start_time: Some("05:30:00".into()),
            ..Default::default()
        };
        state.update_event("al1", patch).unwrap();
        assert_eq!(state.get_snapshot().unwrap().start_time, "05:30:00");

        // Editing another event does not touch the countdown.
        let patch = EventPatch {
            default_start_time: Some("13:00:00".into()),
            ..Default::default()
        };
        state.update_event("al2", patch).unwrap();
        assert_eq!(state.get_snapshot().unwrap().start_time, "05:30:00");
    }

    #[test]
    fn test_deleting_current_event_switches_defaults() {
        let (_clock, state) = state_at(0);
        state.delete_event("al1").unwrap();
        let (events, current) = state.list_events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(current.as_deref(), Some("al2"));
        assert_eq!(state.get_snapshot().unwrap().start_time, "12:00:00");
    }

    #[test]
    fn test_failed_save_leaves_catalog_and_countdown_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("missing").join("events.json"));
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            Arc::new(ManualClock::new(0)),
            EventCatalog::default(),
            Some(store),
        );

        assert!(matches!(
            state.select_event("al2"),
            Err(StateError::Catalog(CatalogError::Io(_)))
        ));
        assert_eq!(state.current_event().unwrap().unwrap().id, "al1");
        assert_eq!(state.get_snapshot().unwrap().start_time, "06:00:00");

        assert!(state.delete_event("al1").is_err());
        assert_eq!(state.list_events().unwrap().0.len(), 3);
    }

    #[test]
    fn test_empty_defaults_keep_current_times() {
        let mut events = crate::services::default_events();
        events.push(Event {
            id: "blank".to_string(),
            name: "Blank".to_string(),
            default_start_time: Some("08:00:00".to_string()),
            default_end_time: Some(String::new()),
        });
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            Arc::new(ManualClock::new(0)),
            EventCatalog::new(events),
            None,
        );

        let snap = state.select_event("blank").unwrap();
        assert_eq!(snap.start_time, "08:00:00");
        assert_eq!(snap.end_time, "07:00:00");
    }

    #[test]
    fn test_reorder_events_keeps_selection() {
        let (_clock, state) = state_at(0);
        let ids: Vec<String> = ["gazeta-esporte", "al1", "al2"]
            .iter()
            .map(|id| id.to_string())
            .collect();

        let events = state.reorder_events(&ids).unwrap();
        assert_eq!(events[0].id, "gazeta-esporte");
        let (_, current) = state.list_events().unwrap();
        assert_eq!(current.as_deref(), Some("al1"));
        assert_eq!(state.get_snapshot().unwrap().start_time, "06:00:00");
    }

    #[test]
    fn test_catalog_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("events.json"));
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            Arc::new(ManualClock::new(0)),
            EventCatalog::default(),
            Some(store.clone()),
        );

        state.select_event("al2").unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.current_id(), Some("al2"));
    }
}
