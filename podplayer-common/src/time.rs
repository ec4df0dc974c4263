//! Time unit helpers
//!
//! Playback engines speak seconds, application state speaks milliseconds.
//! Both are carried as `f64` so fractional positions survive the conversion.

use chrono::{DateTime, Utc};

const MILLIS_PER_SECOND: f64 = 1000.0;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert an engine-native second value to milliseconds
pub fn seconds_to_millis(seconds: f64) -> f64 {
    seconds * MILLIS_PER_SECOND
}

/// Convert a millisecond value from application state to seconds
pub fn millis_to_seconds(millis: f64) -> f64 {
    millis / MILLIS_PER_SECOND
}
