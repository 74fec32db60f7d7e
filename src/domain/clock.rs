//! Time source and calendar arithmetic.
//!
//! Every time-dependent operation reads the current instant from a [`Clock`]
//! injected at construction, never from the system directly, so expiry and
//! same-day logic are deterministic under test. The calendar helpers below
//! are the single definition of "day" and "week" shared by cap-checking,
//! ranking, and the weekly query; "day" means the UTC calendar date.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::sync::Arc;

/// Abstraction for the current instant.
pub trait Clock: Send + Sync + 'static {
    // ---
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Type alias for any backend that implements Clock.
pub type ClockPtr = Arc<dyn Clock>;

/// Production clock backed by the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    // ---
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Creates the production system clock.
pub fn create_system_clock() -> ClockPtr {
    // ---
    Arc::new(SystemClock)
}

/// The UTC calendar date an instant falls on.
pub fn date_of(instant: DateTime<Utc>) -> NaiveDate {
    // ---
    instant.date_naive()
}

/// Half-open instant window `[00:00:00, next midnight)` covering one date.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    // ---
    let start = midnight(date);
    let end = midnight(date + Duration::days(1));
    (start, end)
}

/// Monday and Sunday of the calendar week containing `date`, inclusive.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    // ---
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Half-open instant window covering an inclusive date range.
///
/// A timestamp at exactly `start` midnight is inside the window; one second
/// before it is not, and every instant of the `end` date is inside.
pub fn range_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    // ---
    (midnight(start), midnight(end + Duration::days(1)))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    // ---
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is valid on every date")
        .and_utc()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_through_sunday() {
        // ---
        // 2024-05-15 is a Wednesday.
        let (start, end) = week_bounds(date(2024, 5, 15));
        assert_eq!(start, date(2024, 5, 13));
        assert_eq!(end, date(2024, 5, 19));

        // A Monday is its own week start.
        let (start, end) = week_bounds(date(2024, 5, 13));
        assert_eq!(start, date(2024, 5, 13));
        assert_eq!(end, date(2024, 5, 19));

        // A Sunday belongs to the week that began six days earlier.
        let (start, end) = week_bounds(date(2024, 5, 19));
        assert_eq!(start, date(2024, 5, 13));
        assert_eq!(end, date(2024, 5, 19));
    }

    #[test]
    fn week_window_includes_monday_midnight_exactly() {
        // ---
        let (start, end) = week_bounds(date(2024, 5, 15));
        let (window_start, window_end) = range_bounds(start, end);

        let monday_midnight = Utc.with_ymd_and_hms(2024, 5, 13, 0, 0, 0).unwrap();
        let second_before = Utc.with_ymd_and_hms(2024, 5, 12, 23, 59, 59).unwrap();
        let sunday_night = Utc.with_ymd_and_hms(2024, 5, 19, 23, 59, 59).unwrap();

        assert!(monday_midnight >= window_start && monday_midnight < window_end);
        assert!(second_before < window_start);
        assert!(sunday_night >= window_start && sunday_night < window_end);
    }

    #[test]
    fn day_bounds_cover_exactly_one_date() {
        // ---
        let (start, end) = day_bounds(date(2024, 5, 15));
        assert_eq!(date_of(start), date(2024, 5, 15));
        assert_eq!(end - start, Duration::days(1));

        let last_instant = Utc.with_ymd_and_hms(2024, 5, 15, 23, 59, 59).unwrap();
        assert!(last_instant >= start && last_instant < end);
    }

    #[test]
    fn week_bounds_cross_month_boundaries() {
        // ---
        // 2024-06-01 is a Saturday; its week started Monday 2024-05-27.
        let (start, end) = week_bounds(date(2024, 6, 1));
        assert_eq!(start, date(2024, 5, 27));
        assert_eq!(end, date(2024, 6, 2));
    }
}
