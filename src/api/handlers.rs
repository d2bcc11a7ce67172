//! HTTP endpoint handlers for the timer control surface
//!
//! These are the presentation adapters' whole interface: every route invokes
//! one transition operation on the session host or reads a snapshot. Domain
//! no-ops (resume while complete, stop-alarm while silent) succeed with an
//! unchanged snapshot; only a poisoned lock is an internal error.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use tracing::{error, info};

use super::responses::{HealthResponse, StatusResponse, TimerResponse};
use crate::state::{AppState, TimerSnapshot};

fn respond(
    result: Result<TimerSnapshot, String>,
    message: &str,
) -> Result<Json<TimerResponse>, StatusCode> {
    match result {
        Ok(snapshot) => Ok(Json(TimerResponse::new(message.to_string(), snapshot))),
        Err(e) => {
            error!("Timer operation failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /timer - current snapshot
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerSnapshot>, StatusCode> {
    match state.snapshot() {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to read timer snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start - begin a fresh session
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    info!("Start endpoint called");
    respond(state.start(), "Session started")
}

/// Handle POST /timer/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    info!("Pause endpoint called");
    respond(state.pause(), "Countdown paused")
}

/// Handle POST /timer/resume
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    info!("Resume endpoint called");
    respond(state.resume(), "Countdown resumed")
}

/// Handle POST /timer/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    info!("Reset endpoint called");
    respond(state.reset(), "Session reset")
}

/// Handle POST /timer/alarm/stop
pub async fn stop_alarm_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    info!("Stop-alarm endpoint called");
    respond(state.stop_alarm(), "Alarm stopped")
}

/// Partial settings update; omitted fields are left untouched. Out-of-range
/// values are clamped, never rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsRequest {
    pub focus_minutes: Option<f64>,
    pub break_minutes: Option<f64>,
    pub cycles: Option<f64>,
}

/// Handle PUT /timer/settings
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    info!("Settings endpoint called: {:?}", request);

    let mut result = state.snapshot();
    if let Some(value) = request.focus_minutes {
        result = state.update_focus_minutes(value);
    }
    if let Some(value) = request.break_minutes {
        result = state.update_break_minutes(value);
    }
    if let Some(value) = request.cycles {
        result = state.update_cycles(value);
    }

    respond(result, "Settings updated")
}

/// Handle GET /status - timer snapshot plus server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to read timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
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
