//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/countdown", get(countdown_handler))
        .route("/countdown/stream", get(countdown_stream_handler))
        .route("/countdown/times", put(set_times_handler))
        .route("/countdown/reset", post(reset_handler))
        .route("/countdown/reset-defaults", post(reset_defaults_handler))
        .route("/events", get(list_events_handler).post(add_event_handler))
        .route("/events/export", get(export_events_handler))
        .route("/events/import", post(import_events_handler))
        .route("/events/order", put(reorder_events_handler))
        .route(
            "/events/:id",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route("/events/:id/select", post(select_event_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
