//! Duration conversion between the wire (whole minutes) and storage
//! (seconds).
//!
//! Storage→wire truncates sub-minute precision (lossy); wire→storage is
//! exact. End times are always derived from start time plus duration.

use chrono::{Duration, NaiveDateTime};

/// Whole minutes in a stored duration, truncating sub-minute precision.
pub fn duration_minutes(duration_seconds: i64) -> i64 {
    duration_seconds / 60
}

/// Stored duration for a minute count. Exact: 1 minute = 60 seconds.
pub fn duration_from_minutes(minutes: i64) -> i64 {
    minutes * 60
}

/// `end_time = start_time + duration_minutes`
pub fn end_time(start_time: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    start_time + Duration::minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_minutes_round_trip_is_identity() {
        for n in [0i64, 1, 59, 60, 90, 24 * 60, 100_000] {
            assert_eq!(duration_minutes(duration_from_minutes(n)), n);
        }
    }

    #[test]
    fn test_storage_to_wire_truncates() {
        assert_eq!(duration_minutes(59), 0);
        assert_eq!(duration_minutes(61), 1);
        assert_eq!(duration_minutes(119), 1);
        // truncation is stable under a second round trip
        assert_eq!(duration_from_minutes(duration_minutes(119)), 60);
    }

    #[test]
    fn test_end_time() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let end = end_time(start, 90);
        assert_eq!(end.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 11:00");
    }
}
