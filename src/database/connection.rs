//! Database connection manager
//!
//! Owns the SQLite pool, creates the schema and seeds default settings.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::query;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::checkup_store::CheckupStore;
use super::settings_store::SettingsStore;
use super::types::{is_memory_url, mask_database_url, StoreResult};
use crate::models::settings::default_entries;

/// How long a writer waits for the SQLite write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection manager
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    /// Connect to the database at `database_url`, creating the file if needed
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        info!("Connecting to database: {}", mask_database_url(database_url));

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        // An in-memory database lives as long as its single connection
        let pool = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        debug!("Successfully connected to sqlite database");
        Ok(Self { pool })
    }

    /// Fresh private in-memory database, already migrated
    pub async fn in_memory() -> StoreResult<Self> {
        let manager = Self::new("sqlite::memory:").await?;
        manager.migrate().await?;
        Ok(manager)
    }

    /// Create tables when absent and seed default settings into an empty
    /// settings table. Safe to run any number of times.
    pub async fn migrate(&self) -> StoreResult<()> {
        info!("Running database migrations");

        query(
            r#"
            CREATE TABLE IF NOT EXISTS checkups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                patient_type TEXT NOT NULL,
                start_timestamp INTEGER NOT NULL,
                end_timestamp INTEGER NOT NULL,
                duration_seconds INTEGER NOT NULL CHECK (duration_seconds >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_checkups_start_timestamp
            ON checkups (start_timestamp)
            "#,
        )
        .execute(&self.pool)
        .await?;

        query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        self.seed_default_settings().await?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    async fn seed_default_settings(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&mut *tx)
            .await?;

        if existing == 0 {
            for entry in default_entries() {
                query("INSERT INTO settings (key, value) VALUES (?, ?)")
                    .bind(&entry.key)
                    .bind(&entry.value)
                    .execute(&mut *tx)
                    .await?;
                debug!("Seeded default setting {} = {}", entry.key, entry.value);
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Test database connection
    pub async fn test_connection(&self) -> StoreResult<()> {
        query("SELECT 1").fetch_one(&self.pool).await?;
        debug!("Database connection test successful");
        Ok(())
    }

    pub fn checkup_store(&self) -> CheckupStore {
        CheckupStore::new(self.pool.clone())
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(self.pool.clone())
    }

    /// Close every pooled connection; later store calls fail as unavailable
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}
