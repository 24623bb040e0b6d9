//! Time related utils.

use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Seconds since the Unix epoch for the given time.
///
/// Times before the epoch are clamped to zero.
pub fn unix_seconds(t: DateTime) -> u64 {
    t.timestamp().max(0) as u64
}
