//! Logging configuration for Clinic Timer
//!
//! Structured logging setup plus span macros and domain log helpers.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::models::CompletedSession;

/// Initialize the application logging system.
///
/// `RUST_LOG` wins over `log_level`. JSON output is used when `json` is set,
/// a compact console format otherwise. Later calls are ignored.
pub fn init_logging(log_level: &str, json: bool) {
    let default_filter = format!(
        "clinic_timer={level},tower_http={level},axum::rejection=trace",
        level = log_level
    );

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = Registry::default().with(env_filter);
    let initialized = if json {
        registry.with(json_layer()).try_init()
    } else {
        registry.with(console_layer()).try_init()
    };

    if initialized.is_ok() {
        tracing::info!(json, "Logging system initialized");
    }
}

/// JSON logging layer for production
fn json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
}

/// Console logging layer for development
fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(true)
}

/// Create a span for request logging
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            status_code = tracing::field::Empty,
        )
    };
}

/// Create a span for database operations
#[macro_export]
macro_rules! db_span {
    ($operation:expr, $table:expr) => {
        tracing::debug_span!(
            "database_operation",
            operation = %$operation,
            table = %$table,
        )
    };
}

/// Create a span for timer operations
#[macro_export]
macro_rules! timer_span {
    ($operation:expr, $category:expr) => {
        tracing::info_span!(
            "timer_operation",
            operation = %$operation,
            category = %$category,
        )
    };
}

/// Log application startup
pub fn log_startup(environment: &str) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        "Clinic Timer starting up"
    );
}

/// Log a timer transition from idle to running
pub fn log_timer_started(category: &str, started_at: i64, active_timers: usize) {
    tracing::info!(
        category = %category,
        started_at,
        active_timers,
        "Timer started"
    );
}

/// Log a stopped timer whose session has been stored
pub fn log_session_recorded(session: &CompletedSession, active_timers: usize) {
    tracing::info!(
        id = session.id,
        category = %session.category,
        duration_seconds = session.duration_seconds,
        active_timers,
        "Timer stopped, checkup recorded"
    );
}

pub fn log_reminder_fired(active_timers: usize) {
    tracing::info!(active_timers, "Reminder fired");
}

pub fn log_reminder_rescheduled(interval_minutes: u64) {
    tracing::info!(interval_minutes, "Reminder rescheduled");
}

/// Log a setting change
pub fn log_setting_updated(key: &str, value: &str) {
    tracing::info!(key = %key, value = %value, "Setting updated");
}

/// Log notification delivery; `error` is set when delivery failed
pub fn log_notification_delivery(title: &str, delivery_method: &str, error: Option<&str>) {
    match error {
        None => tracing::info!(
            title = %title,
            delivery_method = %delivery_method,
            "Notification delivered successfully"
        ),
        Some(error) => tracing::warn!(
            title = %title,
            delivery_method = %delivery_method,
            error = %error,
            "Notification delivery failed"
        ),
    }
}

/// Log error with context
pub fn log_error(error: &str, context: &str) {
    tracing::error!(
        error = %error,
        context = %context,
        "Application error occurred"
    );
}
