//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse, Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{
    error::StateError,
    services::{Event, EventPatch, NewEvent},
    state::{AppState, CountdownSnapshot},
};
use super::responses::{
    CountdownResponse, EventListResponse, HealthResponse, ImportResponse, ReorderRequest,
    SetTimesRequest, StatusResponse,
};

/// Handle GET /countdown - Current countdown snapshot
pub async fn countdown_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownSnapshot>, StateError> {
    Ok(Json(state.get_snapshot()?))
}

/// Handle GET /countdown/stream - Push a snapshot on every change
pub async fn countdown_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    info!("Display client subscribed to countdown stream");

    let mut rx = state.snapshot_tx.subscribe();
    let initial = rx.borrow_and_update().clone();

    let updates = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        Some((snapshot, rx))
    });

    let events = stream::once(async move { initial })
        .chain(updates)
        .filter_map(|snapshot| async move {
            match SseEvent::default().event("countdown").json_data(&snapshot) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    warn!("Failed to encode countdown event: {}", e);
                    None
                }
            }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle PUT /countdown/times - Set start and/or end time
pub async fn set_times_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetTimesRequest>,
) -> Result<Json<CountdownResponse>, StateError> {
    let snapshot = state.set_times(request.start_time, request.end_time)?;
    Ok(Json(CountdownResponse::ok("Times updated", snapshot)))
}

/// Handle POST /countdown/reset - Re-sample the clock
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownResponse>, StateError> {
    let snapshot = state.reset()?;
    Ok(Json(CountdownResponse::ok("Countdown refreshed", snapshot)))
}

/// Handle POST /countdown/reset-defaults - Restore the current event's times
pub async fn reset_defaults_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownResponse>, StateError> {
    let snapshot = state.reset_to_defaults()?;
    Ok(Json(CountdownResponse::ok(
        "Countdown reset to event defaults",
        snapshot,
    )))
}

/// Handle GET /events - List events
pub async fn list_events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventListResponse>, StateError> {
    let (events, current_event_id) = state.list_events()?;
    Ok(Json(EventListResponse {
        events,
        current_event_id,
    }))
}

/// Handle POST /events - Add an event
pub async fn add_event_handler(
    State(state): State<Arc<AppState>>,
    Json(new_event): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), StateError> {
    let event = state.add_event(new_event)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Handle PUT /events/:id - Update an event
pub async fn update_event_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, StateError> {
    Ok(Json(state.update_event(&id, patch)?))
}

/// Handle DELETE /events/:id - Remove an event
pub async fn delete_event_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, StateError> {
    Ok(Json(state.delete_event(&id)?))
}

/// Handle POST /events/:id/select - Make an event current
pub async fn select_event_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CountdownResponse>, StateError> {
    let snapshot = state.select_event(&id)?;
    Ok(Json(CountdownResponse::ok(
        format!("Event {} selected", id),
        snapshot,
    )))
}

/// Handle PUT /events/order - Rearrange the event list
pub async fn reorder_events_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<EventListResponse>, StateError> {
    let events = state.reorder_events(&request.ids)?;
    let current_event_id = state.current_event()?.map(|e| e.id);
    Ok(Json(EventListResponse {
        events,
        current_event_id,
    }))
}

/// Handle GET /events/export - Download the events as JSON
pub async fn export_events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StateError> {
    let body = state.export_events()?;
    debug!("Exporting {} bytes of events", body.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"events.json\"",
            ),
        ],
        body,
    ))
}

/// Handle POST /events/import - Replace the events from a JSON array
pub async fn import_events_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ImportResponse>, StateError> {
    let imported = state.import_events(&body)?;
    Ok(Json(ImportResponse {
        status: "ok".to_string(),
        imported,
    }))
}

/// Handle GET /status - Server metadata and the live countdown
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StateError> {
    let countdown = state.get_snapshot()?;
    let current_event = state.current_event()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        countdown,
        current_event,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
