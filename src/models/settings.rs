//! Settings Models
//!
//! Settings are free-form string key/value pairs. Typed readers parse the
//! values they care about and fall back to defaults on malformed input.

use serde::{Deserialize, Serialize};

/// Key of the reminder cadence setting
pub const REMINDER_INTERVAL_KEY: &str = "reminderIntervalMinutes";

/// Reminder cadence used when none is stored or the stored value is unusable
pub const DEFAULT_REMINDER_INTERVAL_MINUTES: u64 = 5;

/// A single stored setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

impl SettingEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Entries written when the settings table is first created empty
pub fn default_entries() -> Vec<SettingEntry> {
    vec![SettingEntry::new(
        REMINDER_INTERVAL_KEY,
        DEFAULT_REMINDER_INTERVAL_MINUTES.to_string(),
    )]
}

/// Parse a reminder interval, falling back to the default for anything that
/// is not a positive integer
pub fn parse_reminder_interval(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|minutes| *minutes > 0)
        .and_then(|minutes| u64::try_from(minutes).ok())
        .unwrap_or(DEFAULT_REMINDER_INTERVAL_MINUTES)
}

/// Validate a key/value pair before it is stored
pub fn validate_setting(key: &str, value: &str) -> Result<(), SettingError> {
    if key.trim().is_empty() {
        return Err(SettingError::EmptyKey);
    }
    if key.len() > 64 {
        return Err(SettingError::KeyTooLong(key.len()));
    }
    if value.len() > 1024 {
        return Err(SettingError::ValueTooLong(value.len()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingError {
    #[error("Setting key must not be empty")]
    EmptyKey,

    #[error("Setting key too long ({0} bytes, maximum 64)")]
    KeyTooLong(usize),

    #[error("Setting value too long ({0} bytes, maximum 1024)")]
    ValueTooLong(usize),
}
