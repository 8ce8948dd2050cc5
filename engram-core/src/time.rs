//! Epoch-millisecond clock helpers. All persisted timestamps are i64 ms.

use chrono::Utc;

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Whole-and-fractional days elapsed between two epoch-ms instants.
/// Negative spans clamp to zero.
pub fn days_between(from_ms: i64, to_ms: i64) -> f64 {
    ((to_ms - from_ms) as f64 / MS_PER_DAY).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_days_apart() {
        let from = 0;
        let to = (10.0 * MS_PER_DAY) as i64;
        assert!((days_between(from, to) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn future_from_clamps_to_zero() {
        assert_eq!(days_between(1000, 0), 0.0);
    }
}
