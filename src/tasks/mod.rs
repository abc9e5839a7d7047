//! Background tasks module
//!
//! This module contains the clock ticker that drives the countdown alongside
//! the HTTP server.

pub mod clock_ticker;

// Re-export main types
pub use clock_ticker::{ClockTicker, TICK_INTERVAL};
