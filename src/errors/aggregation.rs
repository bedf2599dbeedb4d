//! Error types for per-day consumption aggregation.

/// Errors that abort a per-day aggregation.
///
/// Individual block or day failures never show up here; they degrade the
/// affected [`crate::DayEnergyRecord`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    /// More days were requested than the configured limit allows.
    #[error("Cannot check more than {max_days} days back (requested {requested_days} days)")]
    DateRangeExceeded {
        /// Number of days the request covers, today included
        requested_days: u64,
        /// Configured `MAX_DAYS_BACK`
        max_days: u64,
    },
}
