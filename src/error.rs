//! Error handling for Clinic Timer
//!
//! Centralized error type for the caller-facing surface. Component errors
//! convert into it and map onto HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::StoreError;
use crate::logging::log_error;
use crate::models::{CategoryError, IntervalError, PeriodError, SettingError};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    #[error(transparent)]
    InvalidInterval(#[from] IntervalError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Setting(#[from] SettingError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPeriod(_)
            | AppError::InvalidInterval(_)
            | AppError::Category(_)
            | AppError::Setting(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CorruptRecord(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidPeriod(_) => "InvalidPeriod",
            AppError::InvalidInterval(_) => "InvalidInterval",
            AppError::StoreUnavailable(_) => "StoreUnavailable",
            AppError::CorruptRecord(_) => "CorruptRecord",
            AppError::Category(CategoryError::UnknownCategory(_)) => "UnknownCategory",
            AppError::Category(_) => "InvalidCategory",
            AppError::Setting(_) => "InvalidSetting",
            AppError::Validation(_) => "ValidationError",
            AppError::Internal(_) => "InternalError",
        }
    }

    /// Check if this error should be logged as an error vs warning
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::StoreUnavailable(_) | AppError::CorruptRecord(_) | AppError::Internal(_)
        )
    }

    pub fn validation_error(message: &str) -> Self {
        AppError::Validation(message.to_string())
    }

    pub fn internal_error(message: &str) -> Self {
        AppError::Internal(message.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidInterval(e) => AppError::InvalidInterval(e),
            StoreError::Unavailable(e) => AppError::StoreUnavailable(e),
            rejected @ StoreError::Rejected(_) => AppError::internal_error(&rejected.to_string()),
            corrupt @ StoreError::CorruptRecord { .. } => {
                AppError::CorruptRecord(corrupt.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if self.is_server_error() {
            log_error(&message, error_code);
        } else {
            tracing::debug!(error = %message, code = error_code, "Request rejected");
        }

        let body = Json(json!({
            "error": error_code,
            "message": message,
            "timestamp": chrono::Utc::now().timestamp()
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
