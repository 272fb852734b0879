//! Checkup Store
//!
//! Append-only record of completed sessions and the windowed aggregate
//! queries over it.

use sqlx::sqlite::SqlitePool;
use sqlx::{query, query_as};
use tracing::{debug, Instrument};

use super::types::{StoreError, StoreResult};
use crate::db_span;
use crate::models::{AggregateRow, Category, CompletedSession, NewCheckup, TimeWindow};

#[derive(Debug, sqlx::FromRow)]
struct CheckupRow {
    id: i64,
    patient_type: String,
    start_timestamp: i64,
    end_timestamp: i64,
    duration_seconds: i64,
}

impl TryFrom<CheckupRow> for CompletedSession {
    type Error = StoreError;

    fn try_from(row: CheckupRow) -> Result<Self, Self::Error> {
        let category = Category::parse(&row.patient_type).map_err(|e| StoreError::CorruptRecord {
            table: "checkups",
            reason: e.to_string(),
        })?;

        Ok(Self {
            id: row.id,
            category,
            started_at: row.start_timestamp,
            ended_at: row.end_timestamp,
            duration_seconds: row.duration_seconds,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AggregateRowRecord {
    patient_type: String,
    avg_duration: f64,
    session_count: i64,
}

/// Durable record of completed checkup sessions
#[derive(Debug, Clone)]
pub struct CheckupStore {
    pool: SqlitePool,
}

impl CheckupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one session; the duration is computed here and the id is
    /// assigned by the store
    pub async fn insert(&self, fields: &NewCheckup) -> StoreResult<CompletedSession> {
        let duration_seconds = fields.duration_seconds()?;

        let id = query(
            r#"
            INSERT INTO checkups (patient_type, start_timestamp, end_timestamp, duration_seconds)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(fields.category.as_str())
        .bind(fields.started_at)
        .bind(fields.ended_at)
        .bind(duration_seconds)
        .execute(&self.pool)
        .instrument(db_span!("INSERT", "checkups"))
        .await?
        .last_insert_rowid();

        debug!("Checkup saved with ID: {}", id);

        Ok(CompletedSession {
            id,
            category: fields.category.clone(),
            started_at: fields.started_at,
            ended_at: fields.ended_at,
            duration_seconds,
        })
    }

    /// Insert unless an identical session (same category, start and end) is
    /// already stored, in which case the stored one is returned.
    ///
    /// The existence check runs inside the insert statement, under the write
    /// lock; concurrent resubmits queue on the busy timeout.
    pub async fn insert_idempotent(&self, fields: &NewCheckup) -> StoreResult<CompletedSession> {
        let duration_seconds = fields.duration_seconds()?;

        let result = query(
            r#"
            INSERT INTO checkups (patient_type, start_timestamp, end_timestamp, duration_seconds)
            SELECT ?1, ?2, ?3, ?4
            WHERE NOT EXISTS (
                SELECT 1 FROM checkups
                WHERE patient_type = ?1 AND start_timestamp = ?2 AND end_timestamp = ?3
            )
            "#,
        )
        .bind(fields.category.as_str())
        .bind(fields.started_at)
        .bind(fields.ended_at)
        .bind(duration_seconds)
        .execute(&self.pool)
        .instrument(db_span!("INSERT", "checkups"))
        .await?;

        if result.rows_affected() == 1 {
            let id = result.last_insert_rowid();
            debug!("Checkup saved with ID: {}", id);
            return Ok(CompletedSession {
                id,
                category: fields.category.clone(),
                started_at: fields.started_at,
                ended_at: fields.ended_at,
                duration_seconds,
            });
        }

        let row = query_as::<_, CheckupRow>(
            r#"
            SELECT id, patient_type, start_timestamp, end_timestamp, duration_seconds
            FROM checkups
            WHERE patient_type = ? AND start_timestamp = ? AND end_timestamp = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(fields.category.as_str())
        .bind(fields.started_at)
        .bind(fields.ended_at)
        .fetch_one(&self.pool)
        .instrument(db_span!("SELECT", "checkups"))
        .await?;

        debug!("Checkup already stored with ID: {}", row.id);
        row.try_into()
    }

    /// Mean duration and count per category for sessions whose start lies in
    /// the window, ordered by category. Categories without sessions are
    /// absent.
    pub async fn query_averages(&self, window: TimeWindow) -> StoreResult<Vec<AggregateRow>> {
        let records = query_as::<_, AggregateRowRecord>(
            r#"
            SELECT
                patient_type,
                AVG(duration_seconds) AS avg_duration,
                COUNT(*) AS session_count
            FROM checkups
            WHERE start_timestamp >= ? AND start_timestamp < ?
            GROUP BY patient_type
            ORDER BY patient_type
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .instrument(db_span!("AGGREGATE", "checkups"))
        .await?;

        records
            .into_iter()
            .map(|record| {
                let category =
                    Category::parse(&record.patient_type).map_err(|e| StoreError::CorruptRecord {
                        table: "checkups",
                        reason: e.to_string(),
                    })?;
                Ok(AggregateRow {
                    category,
                    average_duration_seconds: record.avg_duration,
                    session_count: record.session_count,
                })
            })
            .collect()
    }

    /// Sessions whose start lies in the window, newest first
    pub async fn sessions_between(&self, window: TimeWindow) -> StoreResult<Vec<CompletedSession>> {
        let rows = query_as::<_, CheckupRow>(
            r#"
            SELECT id, patient_type, start_timestamp, end_timestamp, duration_seconds
            FROM checkups
            WHERE start_timestamp >= ? AND start_timestamp < ?
            ORDER BY start_timestamp DESC, id DESC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CompletedSession::try_from).collect()
    }

    /// Total number of stored sessions
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checkups")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
