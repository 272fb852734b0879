//! Database error types and URL helpers

use crate::models::IntervalError;

/// Errors surfaced by the checkup and settings stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidInterval(#[from] IntervalError),

    #[error("Store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("Store rejected operation: {0}")]
    Rejected(#[source] sqlx::Error),

    #[error("Corrupt record in {table}: {reason}")]
    CorruptRecord { table: &'static str, reason: String },
}

impl From<sqlx::Error> for StoreError {
    /// Transient conditions (closed or exhausted pool, I/O, lock contention)
    /// are unavailability; anything the database refused is a rejection
    fn from(error: sqlx::Error) -> Self {
        let rejected = match &error {
            sqlx::Error::Database(db) => !db.code().is_some_and(|code| is_busy_code(&code)),
            sqlx::Error::RowNotFound
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => true,
            _ => false,
        };

        if rejected {
            StoreError::Rejected(error)
        } else {
            StoreError::Unavailable(error)
        }
    }
}

/// SQLITE_BUSY or SQLITE_LOCKED, including their extended codes
fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>()
        .is_ok_and(|code| matches!(code & 0xff, 5 | 6))
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Whether a SQLite URL names an in-memory database
pub fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains(":memory:") || url.contains("mode=memory")
}

/// Mask credentials and paths in a database URL for logging
pub fn mask_database_url(url: &str) -> String {
    if url.starts_with("sqlite:") {
        url.to_string()
    } else if let Some((scheme, _)) = url.split_once("://") {
        format!("{}://***", scheme)
    } else {
        "***".to_string()
    }
}
