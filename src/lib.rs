//! On-Air Countdown - A broadcast countdown-timer server
//!
//! This library shows the local clock, counts down to a scheduled event's
//! start or end time and tracks how far the end time has been overrun.

pub mod api;
pub mod config;
pub mod countdown;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use tasks::ClockTicker;
pub use utils::signals::shutdown_signal;
