//! UTC day arithmetic for the per-day pipeline
//!
//! The explorer's day listing is keyed by the Unix milliseconds of a UTC
//! midnight, and blocks mined on the current UTC day are still settling, so
//! both the aggregation and the data-access layer need the same notion of
//! "which UTC day is this".

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

/// Unix milliseconds of 00:00:00 UTC on `date`
pub fn day_start_ms(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .timestamp_millis()
}

/// UTC-midnight timestamps from `days_back` days before `today` through
/// `today`, oldest first.
///
/// Always returns `days_back + 1` entries unless the calendar runs out.
///
/// # Examples
///
/// ```rust
/// use blockwatt::days::day_timestamps;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let days = day_timestamps(1, today);
/// assert_eq!(days, vec![1_709_164_800_000, 1_709_251_200_000]);
/// ```
pub fn day_timestamps(days_back: u64, today: NaiveDate) -> Vec<i64> {
    (0..=days_back)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(day_start_ms)
        .collect()
}

/// Same as [`day_timestamps`], relative to the current UTC date
pub fn day_timestamps_until_today(days_back: u64) -> Vec<i64> {
    day_timestamps(days_back, Utc::now().date_naive())
}

/// Whether a block time (Unix seconds) falls on the same UTC day as `now`
pub fn is_same_utc_day(unix_time: i64, now: DateTime<Utc>) -> bool {
    DateTime::from_timestamp(unix_time, 0)
        .is_some_and(|time| time.date_naive() == now.date_naive())
}
