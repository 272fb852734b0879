//! Settings API Endpoints

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AppState;
use crate::error::AppResult;
use crate::models::SettingEntry;

/// Create settings API routes
pub fn create_settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/:key", put(update_setting))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

/// All stored settings
pub async fn get_settings(
    State(service): State<AppState>,
) -> AppResult<Json<BTreeMap<String, String>>> {
    Ok(Json(service.get_settings().await?))
}

/// Store one setting; the reminder interval takes effect from the next tick
pub async fn update_setting(
    State(service): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> AppResult<Json<SettingEntry>> {
    Ok(Json(service.update_setting(&key, &request.value).await?))
}
