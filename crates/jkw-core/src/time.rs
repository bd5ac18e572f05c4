//! Compact relative-time rendering ("2d:3h:5m").
//!
//! Pure: callers supply the elapsed value (or the `now` instant), so output is
//! deterministic for a given input.

use chrono::{DateTime, Utc};

/// One step of a unit table. `per_previous` is how many of the preceding
/// (smaller) unit make one of this unit; it is ignored for the first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnit {
    pub symbol: &'static str,
    pub per_previous: u64,
}

pub const DEFAULT_UNITS: &[TimeUnit] = &[
    TimeUnit {
        symbol: "s",
        per_previous: 1,
    },
    TimeUnit {
        symbol: "m",
        per_previous: 60,
    },
    TimeUnit {
        symbol: "h",
        per_previous: 60,
    },
    TimeUnit {
        symbol: "d",
        per_previous: 24,
    },
];

/// At most this many unit groups are rendered.
const MAX_GROUPS: usize = 3;

/// Splits `seconds` across `units` (smallest first) and renders the three
/// largest non-zero groups, largest first, joined with `:`.
///
/// Negative and non-finite input is treated as zero; zero renders as "".
pub fn format_elapsed(seconds: f64, units: &[TimeUnit]) -> String {
    let mut value = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let mut counts = Vec::with_capacity(units.len());
    for (idx, unit) in units.iter().enumerate() {
        match units.get(idx + 1) {
            Some(next) => {
                let size = next.per_previous.max(1);
                let count = value % size;
                counts.push((unit.symbol, count));
                value = (value - count) / size;
            }
            None => counts.push((unit.symbol, value)),
        }
    }

    counts
        .iter()
        .rev()
        .filter(|(_, count)| *count > 0)
        .take(MAX_GROUPS)
        .map(|(symbol, count)| format!("{count}{symbol}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// [`format_elapsed`] with seconds, minutes, hours and days.
pub fn format_age(seconds: f64) -> String {
    format_elapsed(seconds, DEFAULT_UNITS)
}

/// Seconds between a Jenkins millisecond timestamp and `now`. Negative when
/// the timestamp lies in the future; saturates on out-of-range timestamps.
pub fn seconds_since(timestamp_ms: i64, now: DateTime<Utc>) -> f64 {
    now.timestamp_millis().saturating_sub(timestamp_ms) as f64 / 1000.0
}

pub fn age_since(timestamp_ms: i64, now: DateTime<Utc>) -> String {
    format_age(seconds_since(timestamp_ms, now))
}
