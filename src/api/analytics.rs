//! Analytics API Endpoints

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use super::{AppState, PeriodQuery};
use crate::error::{AppError, AppResult};
use crate::models::{AggregateRow, AnalyticsSummary};

/// Create analytics API routes
pub fn create_analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/averages", get(get_averages))
        .route("/summary", get(get_summary))
}

fn required_period(query: &PeriodQuery) -> AppResult<&str> {
    query
        .period
        .as_deref()
        .ok_or_else(|| AppError::validation_error("query parameter 'period' is required"))
}

/// Per-category average duration for a period
pub async fn get_averages(
    State(service): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<AggregateRow>>> {
    let period = required_period(&query)?;
    Ok(Json(service.get_averages(period).await?))
}

/// Totals and the busiest category for a period
pub async fn get_summary(
    State(service): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    let period = required_period(&query)?;
    Ok(Json(service.get_summary(period).await?))
}
