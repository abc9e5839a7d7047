//! State management module
//!
//! This module contains the countdown inputs, the snapshot handed to displays
//! and the shared application state that owns them.

pub mod app_state;
pub mod countdown_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{CountdownInputs, CountdownSnapshot};
