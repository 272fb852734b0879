//! Checkup API Endpoints
//!
//! Saving externally timed sessions and listing sessions in a period.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::{AppState, PeriodQuery};
use crate::error::AppResult;
use crate::models::{CompletedSession, EpochMillis};

/// Create checkup API routes
pub fn create_checkup_routes() -> Router<AppState> {
    Router::new().route("/", get(list_checkups).post(save_checkup))
}

/// A finished session timed by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCheckupRequest {
    pub category: String,
    pub started_at: EpochMillis,
    pub ended_at: EpochMillis,
}

/// Store a completed session; resubmitting the same session is harmless
pub async fn save_checkup(
    State(service): State<AppState>,
    Json(request): Json<SaveCheckupRequest>,
) -> AppResult<(StatusCode, Json<CompletedSession>)> {
    let session = service
        .save_completed_session(&request.category, request.started_at, request.ended_at)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Sessions started in the period (default `day`), newest first
pub async fn list_checkups(
    State(service): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<CompletedSession>>> {
    let period = query.period.as_deref().unwrap_or("day");
    Ok(Json(service.sessions_in(period).await?))
}
