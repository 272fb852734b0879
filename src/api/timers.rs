//! Timer API Endpoints
//!
//! Per-category start/stop and the list of running timers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppResult;
use crate::models::{ActiveTimerView, CompletedSession, RunningTimer};

/// Create timer API routes
pub fn create_timer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active_timers))
        .route("/:category/start", post(start_timer))
        .route("/:category/stop", post(stop_timer))
}

/// Response to a start request; `started` is false when the category was
/// already running
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTimerResponse {
    pub started: bool,
    pub timer: RunningTimer,
    pub active_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTimersResponse {
    pub timers: Vec<ActiveTimerView>,
    pub active_count: usize,
}

/// Start the timer for a category
pub async fn start_timer(
    State(service): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<StartTimerResponse>> {
    let outcome = service.start_timer(&category).await?;

    Ok(Json(StartTimerResponse {
        started: outcome.is_new(),
        timer: outcome.timer().clone(),
        active_count: service.active_count(),
    }))
}

/// Stop the timer for a category; `null` when it was not running
pub async fn stop_timer(
    State(service): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Option<CompletedSession>>> {
    Ok(Json(service.stop_timer(&category).await?))
}

/// Running timers with elapsed time
pub async fn list_active_timers(State(service): State<AppState>) -> Json<ActiveTimersResponse> {
    let timers = service.active_timers().await;
    Json(ActiveTimersResponse {
        active_count: timers.len(),
        timers,
    })
}
