//! Checkup Session Models
//!
//! A [`RunningTimer`] lives in memory while a checkup is in progress; stopping
//! it yields a [`CompletedSession`] that is persisted and never mutated.
//! All instants are epoch milliseconds.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Epoch milliseconds
pub type EpochMillis = i64;

/// Session bounds that do not describe a storable interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("Invalid interval: session ends at {ended_at} before it starts at {started_at}")]
    EndsBeforeStart {
        started_at: EpochMillis,
        ended_at: EpochMillis,
    },

    #[error("Invalid interval: span from {started_at} to {ended_at} is out of range")]
    OutOfRange {
        started_at: EpochMillis,
        ended_at: EpochMillis,
    },
}

/// Whole seconds between two instants, sub-second remainder discarded
pub fn duration_seconds(
    started_at: EpochMillis,
    ended_at: EpochMillis,
) -> Result<i64, IntervalError> {
    if ended_at < started_at {
        return Err(IntervalError::EndsBeforeStart {
            started_at,
            ended_at,
        });
    }
    let span = ended_at
        .checked_sub(started_at)
        .ok_or(IntervalError::OutOfRange {
            started_at,
            ended_at,
        })?;
    Ok(span / 1000)
}

/// In-progress timer for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTimer {
    pub category: Category,
    pub started_at: EpochMillis,
}

impl RunningTimer {
    pub fn new(category: Category, started_at: EpochMillis) -> Self {
        Self {
            category,
            started_at,
        }
    }

    /// Milliseconds elapsed at `now`, never negative
    pub fn elapsed_millis(&self, now: EpochMillis) -> i64 {
        (now - self.started_at).max(0)
    }

    /// Fields for the session this timer becomes when stopped at `ended_at`
    pub fn finish(&self, ended_at: EpochMillis) -> NewCheckup {
        NewCheckup {
            category: self.category.clone(),
            started_at: self.started_at,
            ended_at,
        }
    }
}

/// Fields of a session not yet stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckup {
    pub category: Category,
    pub started_at: EpochMillis,
    pub ended_at: EpochMillis,
}

impl NewCheckup {
    pub fn duration_seconds(&self) -> Result<i64, IntervalError> {
        duration_seconds(self.started_at, self.ended_at)
    }
}

/// A stored checkup session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub id: i64,
    pub category: Category,
    pub started_at: EpochMillis,
    pub ended_at: EpochMillis,
    pub duration_seconds: i64,
}

/// Running timer as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimerView {
    pub category: Category,
    pub started_at: EpochMillis,
    pub elapsed_ms: i64,
}

impl ActiveTimerView {
    pub fn at(timer: &RunningTimer, now: EpochMillis) -> Self {
        Self {
            category: timer.category.clone(),
            started_at: timer.started_at,
            elapsed_ms: timer.elapsed_millis(now),
        }
    }
}
