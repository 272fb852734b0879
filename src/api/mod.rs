//! API module for Clinic Timer
//!
//! REST endpoints, routing and HTTP middleware.

pub mod analytics;
pub mod checkups;
pub mod settings;
pub mod timers;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::models::Category;
use crate::request_span;
use crate::services::ClinicService;

pub use analytics::create_analytics_routes;
pub use checkups::create_checkup_routes;
pub use settings::create_settings_routes;
pub use timers::create_timer_routes;

/// Shared handler state
pub type AppState = Arc<ClinicService>;

/// `?period=` query parameter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_timers: usize,
    pub reminder_interval_minutes: u64,
}

/// Build the application router with middleware applied
pub fn create_router(service: AppState, config: &Config) -> Router {
    Router::new()
        .nest("/api", create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        request_span!(request.method(), request.uri().path())
                    }),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
                .layer(cors_layer(&config.cors_origins)),
        )
        .with_state(service)
}

/// Routes under `/api`
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .nest("/timers", create_timer_routes())
        .nest("/checkups", create_checkup_routes())
        .nest("/analytics", create_analytics_routes())
        .nest("/settings", create_settings_routes())
        .route("/categories", get(list_categories))
        .route("/health", get(health_check))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Configured patient categories
pub async fn list_categories(State(service): State<AppState>) -> Json<Vec<Category>> {
    Json(service.categories().iter().cloned().collect())
}

pub async fn health_check(State(service): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_timers: service.active_count(),
        reminder_interval_minutes: service.reminder_interval_minutes(),
    })
}
