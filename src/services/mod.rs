//! Event catalog services
//!
//! This module contains the event catalog (the operator's list of programs
//! and their default times) and its JSON file persistence.

pub mod catalog_store;
pub mod event_catalog;

// Re-export main types
pub use catalog_store::CatalogStore;
pub use event_catalog::{default_events, Event, EventCatalog, EventPatch, NewEvent};
