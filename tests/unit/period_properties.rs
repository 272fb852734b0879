//! Period Calculator Tests
//!
//! Window properties checked across every day of a leap year, in UTC and in
//! a timezone with DST changes.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use clinic_timer::models::Period;
use clinic_timer::services::PeriodCalculator;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn noon_each_day_of_2024() -> impl Iterator<Item = DateTime<Utc>> {
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().unwrap();
    (0..366).map(move |offset| first + Duration::days(offset))
}

fn local(tz: Tz, millis: i64) -> DateTime<Tz> {
    tz.timestamp_millis_opt(millis).single().unwrap()
}

#[test]
fn test_windows_contain_reference_instant() {
    for tz in [Tz::UTC, chrono_tz::America::New_York, chrono_tz::Europe::Berlin] {
        let calc = PeriodCalculator::new(tz);
        for now in noon_each_day_of_2024() {
            for period in [Period::Day, Period::Week, Period::Month] {
                let window = calc.bounds(period, now);
                assert!(
                    window.contains(now.timestamp_millis()),
                    "{period} window for {now} in {tz:?} does not contain it"
                );
            }
        }
    }
}

#[test]
fn test_day_and_week_have_fixed_length() {
    let calc = PeriodCalculator::new(chrono_tz::America::New_York);
    for now in noon_each_day_of_2024() {
        let day = calc.bounds(Period::Day, now);
        assert_eq!(day.end - day.start, DAY_MS);

        let week = calc.bounds(Period::Week, now);
        assert_eq!(week.end - week.start, 7 * DAY_MS);
    }
}

#[test]
fn test_week_starts_at_sunday_midnight() {
    let tz = chrono_tz::Europe::Berlin;
    let calc = PeriodCalculator::new(tz);
    for now in noon_each_day_of_2024() {
        let start = local(tz, calc.bounds(Period::Week, now).start);
        assert_eq!(start.weekday(), Weekday::Sun);
        assert_eq!(start.time(), chrono::NaiveTime::MIN);
    }
}

#[test]
fn test_month_windows_tile_the_year() {
    let tz = chrono_tz::America::New_York;
    let calc = PeriodCalculator::new(tz);

    let mut previous_end = None;
    let mut months = 0;
    for now in noon_each_day_of_2024() {
        let window = calc.bounds(Period::Month, now);
        let start = local(tz, window.start);
        assert_eq!(start.day(), 1);
        assert_eq!(start.time(), chrono::NaiveTime::MIN);

        if previous_end != Some(window.end) {
            if let Some(end) = previous_end {
                assert_eq!(window.start, end, "gap between months at {now}");
            }
            previous_end = Some(window.end);
            months += 1;
        }
    }
    assert_eq!(months, 12);
}

#[test]
fn test_bounds_for_rejects_unknown_names() {
    let calc = PeriodCalculator::default();
    let now = Utc::now();
    for name in ["", "Day", "WEEK", "year", "month "] {
        assert!(calc.bounds_for(name, now).is_err(), "accepted {name:?}");
    }
    for name in ["day", "week", "month"] {
        assert!(calc.bounds_for(name, now).is_ok());
    }
}
