//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    error::{CatalogError, StateError},
    services::Event,
    state::CountdownSnapshot,
};

/// Body of PUT /countdown/times
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetTimesRequest {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Response for countdown-changing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownSnapshot,
}

impl CountdownResponse {
    pub fn ok(message: impl Into<String>, countdown: CountdownSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            countdown,
        }
    }
}

/// Event list with the current selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub current_event_id: Option<String>,
}

/// Body of PUT /events/order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: String,
    pub imported: usize,
}

/// Status response with server metadata and the live countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownSnapshot,
    pub current_event: Option<Event>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StateError {
    fn status_code(&self) -> StatusCode {
        match self {
            StateError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StateError::EndTimeLocked => StatusCode::CONFLICT,
            StateError::Catalog(e) => match e {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::DuplicateName(_) => StatusCode::CONFLICT,
                CatalogError::EmptyName
                | CatalogError::InvalidImport(_)
                | CatalogError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
                CatalogError::Io(_)
                | CatalogError::Json(_)
                | CatalogError::InvalidCatalog(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for StateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
