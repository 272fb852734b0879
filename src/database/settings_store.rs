//! Settings Store
//!
//! Key/value configuration persisted beside the checkups, last write wins.

use sqlx::sqlite::SqlitePool;
use sqlx::{query, query_as, query_scalar};
use std::collections::BTreeMap;
use tracing::debug;

use super::types::StoreResult;

/// Durable key/value settings table
#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: SqlitePool,
}

impl SettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored value for `key`, if any
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Every stored setting, keyed by name
    pub async fn get_all(&self) -> StoreResult<BTreeMap<String, String>> {
        let rows = query_as::<_, (String, String)>("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Insert or replace a setting
    pub async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!("Setting updated: {} = {}", key, value);
        Ok(())
    }
}
