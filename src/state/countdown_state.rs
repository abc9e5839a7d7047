//! Countdown inputs and the snapshot published to displays

use serde::{Deserialize, Serialize};

use crate::countdown::{evaluate, format_seconds, Phase, Variant};

/// The configured boundaries plus the latest wall-clock sample.
///
/// Kept together so a reader never sees a sample paired with stale boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownInputs {
    pub start_time: String,
    pub end_time: String,
    pub current_seconds: u64,
}

impl CountdownInputs {
    pub fn new(start_time: String, end_time: String, current_seconds: u64) -> Self {
        Self {
            start_time,
            end_time,
            current_seconds,
        }
    }

    /// Derive everything a display needs from the current inputs
    pub fn snapshot(&self) -> CountdownSnapshot {
        let countdown = evaluate(&self.start_time, &self.end_time, self.current_seconds);

        CountdownSnapshot {
            local_time: format_seconds(self.current_seconds as i64),
            current_seconds: self.current_seconds,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            phase: countdown.phase,
            remaining_time: format_seconds(countdown.remaining_seconds as i64),
            remaining_seconds: countdown.remaining_seconds,
            overflow_time: format_seconds(countdown.overflow_seconds as i64),
            overflow_seconds: countdown.overflow_seconds,
            has_started: countdown.has_started,
            is_overflow: countdown.is_overflow(),
            variant: countdown.variant,
            end_time_editable: countdown.has_started,
        }
    }
}

/// Read-only view of the countdown, recomputed once per tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub local_time: String,
    pub current_seconds: u64,
    pub start_time: String,
    pub end_time: String,
    pub phase: Phase,
    pub remaining_time: String,
    pub remaining_seconds: u64,
    pub overflow_time: String,
    pub overflow_seconds: u64,
    pub has_started: bool,
    pub is_overflow: bool,
    pub variant: Variant,
    /// The end time may only be edited by hand once the event has started
    pub end_time_editable: bool,
}

impl Default for CountdownSnapshot {
    fn default() -> Self {
        CountdownInputs::default().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_before_start() {
        let inputs = CountdownInputs::new("00:10:00".into(), "01:00:00".into(), 86_000);
        let snap = inputs.snapshot();

        assert_eq!(snap.local_time, "23:53:20");
        assert_eq!(snap.phase, Phase::ToStart);
        assert_eq!(snap.remaining_time, "00:16:40");
        assert_eq!(snap.overflow_time, "00:00:00");
        assert!(!snap.has_started);
        assert!(!snap.end_time_editable);
        assert!(!snap.is_overflow);
    }

    #[test]
    fn test_snapshot_in_overflow() {
        let inputs = CountdownInputs::new("09:00:00".into(), "10:00:00".into(), 36_500);
        let snap = inputs.snapshot();

        assert_eq!(snap.remaining_time, "00:00:00");
        assert_eq!(snap.overflow_time, "00:08:20");
        assert!(snap.is_overflow);
        assert!(snap.end_time_editable);
        assert_eq!(snap.variant, Variant::Alert);
    }

    #[test]
    fn test_snapshot_serializes_tags() {
        let inputs = CountdownInputs::new("10:00:00".into(), "".into(), 0);
        let json = serde_json::to_value(inputs.snapshot()).unwrap();
        assert_eq!(json["phase"], "to_start");
        assert_eq!(json["variant"], "running");
    }
}
