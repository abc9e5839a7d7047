//! JSON file persistence for the event catalog

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::error::CatalogResult;
use super::event_catalog::EventCatalog;

/// Reads and writes the catalog at a fixed path
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog, falling back to the built-in events if the file is missing
    pub fn load(&self) -> CatalogResult<EventCatalog> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let catalog: EventCatalog = serde_json::from_str(&text)?;
                let catalog = catalog.normalized()?;
                info!(
                    "Loaded {} events from {}",
                    catalog.events().len(),
                    self.path.display()
                );
                Ok(catalog)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No catalog at {}, using built-in events",
                    self.path.display()
                );
                Ok(EventCatalog::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the catalog atomically (temp file + rename)
    pub fn save(&self, catalog: &EventCatalog) -> CatalogResult<()> {
        let text = serde_json::to_string_pretty(catalog)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Saved catalog to {}", self.path.display());
        Ok(())
    }
}
