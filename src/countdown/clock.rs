//! Wall-clock sampling

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, Timelike};

use super::time_of_day::SECONDS_PER_DAY;

/// Source of the local time of day, so the ticker can be driven by a fake in tests.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current local time as seconds since midnight (0..=86399)
    fn seconds_since_midnight(&self) -> u64;
}

/// Local system clock backed by `chrono::Local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn seconds_since_midnight(&self) -> u64 {
        sample_wall_clock_seconds()
    }
}

/// Read the local wall clock reduced to seconds since midnight.
pub fn sample_wall_clock_seconds() -> u64 {
    let now = Local::now();
    u64::from(now.hour()) * 3600 + u64::from(now.minute()) * 60 + u64::from(now.second())
}

/// Clock whose reading is set by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: AtomicU64,
}

impl ManualClock {
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds: AtomicU64::new(seconds % SECONDS_PER_DAY),
        }
    }

    /// Jump to an absolute time of day
    pub fn set(&self, seconds: u64) {
        self.seconds.store(seconds % SECONDS_PER_DAY, Ordering::SeqCst);
    }

    /// Move forward, wrapping past midnight
    pub fn advance(&self, seconds: u64) {
        let next = (self.seconds.load(Ordering::SeqCst) + seconds) % SECONDS_PER_DAY;
        self.seconds.store(next, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn seconds_since_midnight(&self) -> u64 {
        self.seconds.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_in_range() {
        let seconds = SystemClock.seconds_since_midnight();
        assert!(seconds < SECONDS_PER_DAY);
    }

    #[test]
    fn test_manual_clock_wraps_at_midnight() {
        let clock = ManualClock::new(86_390);
        clock.advance(15);
        assert_eq!(clock.seconds_since_midnight(), 5);

        clock.set(36_000);
        assert_eq!(clock.seconds_since_midnight(), 36_000);
    }
}
