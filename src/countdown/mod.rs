//! Countdown core
//!
//! Time-of-day text handling, wall-clock sampling and the engine that turns a
//! sample plus the configured start/end into remaining and overflow time.

pub mod clock;
pub mod engine;
pub mod time_of_day;

// Re-export main types
pub use clock::{sample_wall_clock_seconds, Clock, ManualClock, SystemClock};
pub use engine::{evaluate, Countdown, Phase, Variant};
pub use time_of_day::{format_seconds, mask_time_input, parse_time_of_day, SECONDS_PER_DAY};
