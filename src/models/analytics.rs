//! Analytics Models
//!
//! Aggregation windows and the rows computed over them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::category::Category;
use super::checkup::EpochMillis;

/// Named aggregation window
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

/// Unrecognized aggregation window name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid period '{0}': expected one of day, week, month")]
pub struct PeriodError(pub String);

impl Period {
    /// Parse an exact lowercase period name
    pub fn parse(name: &str) -> Result<Self, PeriodError> {
        Self::from_str(name).map_err(|_| PeriodError(name.to_string()))
    }
}

/// Half-open interval `[start, end)` in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: EpochMillis,
    pub end: EpochMillis,
}

impl TimeWindow {
    pub fn contains(&self, instant: EpochMillis) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Per-category average over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub category: Category,
    pub average_duration_seconds: f64,
    pub session_count: i64,
}

/// Whole-window figures derived from the aggregate rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub period: Period,
    pub window: TimeWindow,
    pub total_sessions: i64,
    pub most_active_category: Option<Category>,
    pub overall_average_seconds: Option<f64>,
}

impl AnalyticsSummary {
    /// Summarize rows already ordered by category
    #[allow(clippy::cast_precision_loss)]
    pub fn from_rows(period: Period, window: TimeWindow, rows: &[AggregateRow]) -> Self {
        let total_sessions: i64 = rows.iter().map(|row| row.session_count).sum();

        // Ties keep the earlier category
        let most_active_category = rows
            .iter()
            .fold(None::<&AggregateRow>, |best, row| match best {
                Some(current) if current.session_count >= row.session_count => Some(current),
                _ => Some(row),
            })
            .map(|row| row.category.clone());

        let overall_average_seconds = (total_sessions > 0).then(|| {
            let weighted: f64 = rows
                .iter()
                .map(|row| row.average_duration_seconds * row.session_count as f64)
                .sum();
            weighted / total_sessions as f64
        });

        Self {
            period,
            window,
            total_sessions,
            most_active_category,
            overall_average_seconds,
        }
    }
}
