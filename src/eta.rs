//! Rate and remaining-time estimation.

use std::time::Instant;

/// Shown instead of a time that would be meaningless.
pub const UNKNOWN: &str = "**:**:**";

/// Anything beyond 99 hours is as good as unknown.
const MAX_SECS: f64 = 99.0 * 60.0 * 60.0;

/// Format a number of seconds as `HH:MM:SS`.
///
/// Negative values and values over 99 hours give [`UNKNOWN`].
///
/// ```
/// use progline::eta::{hms, UNKNOWN};
///
/// assert_eq!(hms(3725.9), "01:02:05");
/// assert_eq!(hms(-1.0), UNKNOWN);
/// ```
pub fn hms(secs: f64) -> String {
    // Also rejects NaN.
    if !(0.0..=MAX_SECS).contains(&secs) {
        return UNKNOWN.to_string();
    }

    let total = secs as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Average items per second between `started` and `last_change`.
///
/// This is the average over the whole run, not a recent rate. Zero if no time
/// has passed.
pub fn throughput(count: u64, started: Instant, last_change: Instant) -> f64 {
    let secs = last_change.saturating_duration_since(started).as_secs_f64();

    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Estimated time left, formatted by [`hms`].
///
/// The estimate is "what's left at the current rate", minus however long it has
/// been since the count last changed.
pub fn remaining(
    count: u64,
    expected: u64,
    tps: f64,
    last_change: Instant,
    now: Instant,
) -> String {
    if tps == 0.0 {
        return UNKNOWN.to_string();
    }

    let todo = expected.saturating_sub(count) as f64;
    let idle = now.saturating_duration_since(last_change).as_secs_f64();
    hms(todo / tps - idle)
}
