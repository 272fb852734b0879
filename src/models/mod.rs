//! Data models for Clinic Timer
//!
//! Domain types shared by the stores, services and API.

pub mod analytics;
pub mod category;
pub mod checkup;
pub mod settings;

pub use analytics::{AggregateRow, AnalyticsSummary, Period, PeriodError, TimeWindow};
pub use category::{Category, CategoryError, CategorySet};
pub use checkup::{
    duration_seconds, ActiveTimerView, CompletedSession, EpochMillis, IntervalError, NewCheckup,
    RunningTimer,
};
pub use settings::{SettingEntry, SettingError, REMINDER_INTERVAL_KEY};
