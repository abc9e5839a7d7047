//! Countdown engine
//!
//! Pure derivation of the countdown from the configured start/end text and a
//! wall-clock sample. Nothing here is stored between ticks: `has_started` is
//! recomputed from the sample every time.

use serde::{Deserialize, Serialize};

use super::time_of_day::{parse_time_of_day, SECONDS_PER_DAY};

/// Remaining seconds above which the countdown is `Running`
pub const WARNING_THRESHOLD_SECS: u64 = 30;
/// Remaining seconds at or below which the countdown is `Alert`
pub const ALERT_THRESHOLD_SECS: u64 = 10;

/// Urgency tier of the remaining countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Running,
    Warning,
    Alert,
}

impl Variant {
    /// Classify a remaining duration. No hysteresis.
    pub fn for_remaining(remaining_seconds: u64) -> Self {
        if remaining_seconds > WARNING_THRESHOLD_SECS {
            Variant::Running
        } else if remaining_seconds > ALERT_THRESHOLD_SECS {
            Variant::Warning
        } else {
            Variant::Alert
        }
    }
}

/// Which boundary the countdown is heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ToStart,
    ToEnd,
    Idle,
}

/// Result of one engine evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub has_started: bool,
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub overflow_seconds: u64,
    pub variant: Variant,
}

impl Countdown {
    pub fn is_overflow(&self) -> bool {
        self.overflow_seconds > 0
    }
}

/// Evaluate the countdown for a given sample.
///
/// Empty `start_time`/`end_time` mean "not set". Before the start, the
/// distance to the start wraps forward by one day when negative; after it,
/// the distance to the end clamps at zero and the excess becomes overflow.
pub fn evaluate(start_time: &str, end_time: &str, current_seconds: u64) -> Countdown {
    let start = (!start_time.is_empty()).then(|| parse_time_of_day(start_time));
    let end = (!end_time.is_empty()).then(|| parse_time_of_day(end_time));

    let has_started = matches!(start, Some(start) if current_seconds >= start);

    let (phase, remaining_seconds) = match (has_started, start, end) {
        (false, Some(start), _) => {
            let remaining = if start >= current_seconds {
                start - current_seconds
            } else {
                start + SECONDS_PER_DAY - current_seconds
            };
            (Phase::ToStart, remaining)
        }
        (true, _, Some(end)) => (Phase::ToEnd, end.saturating_sub(current_seconds)),
        _ => (Phase::Idle, 0),
    };

    let overflow_seconds = match (has_started, end) {
        (true, Some(end)) => current_seconds.saturating_sub(end),
        _ => 0,
    };

    Countdown {
        has_started,
        phase,
        remaining_seconds,
        overflow_seconds,
        variant: Variant::for_remaining(remaining_seconds),
    }
}
