//! Period Calculator
//!
//! Turns a named period and a reference instant into the half-open window
//! `[start, end)` used to filter sessions by their start time. "Local" means
//! the configured clinic timezone.
//!
//! - `day`: local midnight of the reference date, plus 24 hours.
//! - `week`: local midnight of the Sunday on or before the reference date,
//!   plus 7 * 24 hours.
//! - `month`: local midnight of the 1st, up to local midnight of the 1st of
//!   the following month.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::{Period, PeriodError, TimeWindow};

/// Computes aggregation windows in a fixed timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCalculator {
    timezone: Tz,
}

impl PeriodCalculator {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Window for a period name; unknown names are rejected, never defaulted
    pub fn bounds_for(&self, period: &str, now: DateTime<Utc>) -> Result<TimeWindow, PeriodError> {
        Ok(self.bounds(Period::parse(period)?, now))
    }

    pub fn bounds(&self, period: Period, now: DateTime<Utc>) -> TimeWindow {
        let today = now.with_timezone(&self.timezone).date_naive();

        let (start, end) = match period {
            Period::Day => {
                let start = self.local_midnight(today);
                (start, start + Duration::hours(24))
            }
            Period::Week => {
                let days_since_sunday = i64::from(today.weekday().num_days_from_sunday());
                let start = self.local_midnight(today - Duration::days(days_since_sunday));
                (start, start + Duration::hours(7 * 24))
            }
            Period::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let next_first = first
                    .checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX);
                (self.local_midnight(first), self.local_midnight(next_first))
            }
        };

        TimeWindow {
            start: start.timestamp_millis(),
            end: end.timestamp_millis(),
        }
    }

    /// Start of `date` in the clinic timezone. Where midnight falls in a DST
    /// gap, the first valid local minute after it is used.
    fn local_midnight(&self, date: NaiveDate) -> DateTime<Tz> {
        let midnight = date.and_time(NaiveTime::MIN);

        (0..=24 * 60)
            .find_map(|minutes| {
                self.timezone
                    .from_local_datetime(&(midnight + Duration::minutes(minutes)))
                    .earliest()
            })
            .unwrap_or_else(|| self.timezone.from_utc_datetime(&midnight))
    }
}

impl Default for PeriodCalculator {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}
