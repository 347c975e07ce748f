//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, warn};

use crate::{
    services::InboundMessage,
    state::{AppState, Outcome, PresetFamily},
};
use super::responses::{ApiResponse, HealthResponse, SnapshotStatus, StatusResponse};

/// Handle POST /ui/message - Dispatch one message from the UI pane
pub async fn ui_message_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let message: InboundMessage = match serde_json::from_value(body) {
        Ok(message) => message,
        Err(e) => {
            warn!("Rejected UI message: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    format!("Unrecognised UI message: {}", e),
                    &state.get_timer_state(),
                )),
            );
        }
    };

    // Preset and toggle commands write settings files synchronously
    let dispatch_state = Arc::clone(&state);
    let outcome = match tokio::task::spawn_blocking(move || dispatch_state.handle_message(message))
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("UI message dispatch failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    format!("Dispatch of '{}' failed", message.command()),
                    &state.get_timer_state(),
                )),
            );
        }
    };
    let timer = state.get_timer_state();
    match outcome {
        Outcome::Done(msg) => (StatusCode::OK, Json(ApiResponse::ok(msg, &timer))),
        Outcome::Unchanged(msg) => (StatusCode::OK, Json(ApiResponse::unchanged(msg, &timer))),
        // The dispatcher did its job; the failure is reported in the body
        Outcome::Failed(msg) => (StatusCode::OK, Json(ApiResponse::error(msg, &timer))),
        Outcome::Unsupported(msg) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(ApiResponse::unsupported(msg, &timer)),
        ),
    }
}

/// Handle GET /events - Stream UI messages and notifications as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream subscriber connected");
    let ui = broadcast_events(state.ui.subscribe(), "ui");
    let notifications = broadcast_events(state.notifier.subscribe(), "notification");

    Sse::new(stream::select(ui, notifications)).keep_alive(KeepAlive::default())
}

/// Turn a broadcast receiver into a stream of named SSE events
fn broadcast_events<T>(
    rx: broadcast::Receiver<T>,
    name: &'static str,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static
where
    T: Serialize + Clone + Send + 'static,
{
    stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(item) => match Event::default().event(name).json_data(&item) {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(e) => warn!("Failed to encode {} event: {}", name, e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} {} events", skipped, name);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// Handle GET /status - Return current timer and preset status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: (&state.get_timer_state()).into(),
        snapshots: SnapshotStatus {
            theme: state.presets.has_snapshot(PresetFamily::Theme),
            typography: state.presets.has_snapshot(PresetFamily::Typography),
        },
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
