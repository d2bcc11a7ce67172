//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod expenses;
pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use expenses::{extract_handler, logs_handler};
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/alarm/stop", post(stop_alarm_handler))
        .route("/timer/settings", put(settings_handler))
        .route("/expenses/extract", post(extract_handler))
        .route("/expenses/logs", get(logs_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
