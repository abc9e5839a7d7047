//! Error types for the event catalog

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("event not found: {0}")]
    NotFound(String),

    #[error("an event named '{0}' already exists")]
    DuplicateName(String),

    #[error("event name must not be empty")]
    EmptyName,

    #[error("import rejected: {0}")]
    InvalidImport(String),

    #[error("catalog file rejected: {0}")]
    InvalidCatalog(String),

    #[error("reorder rejected: {0}")]
    InvalidOrder(String),

    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures surfaced by shared application state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to lock {0}")]
    Lock(&'static str),

    #[error("end time can only be changed after the event has started")]
    EndTimeLocked,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
