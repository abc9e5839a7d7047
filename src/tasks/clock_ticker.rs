//! Clock ticker background task

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{error, info};

use crate::state::AppState;

/// Sampling cadence of the wall clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to the running ticker. The task stops when this is shut down or dropped.
#[derive(Debug)]
pub struct ClockTicker {
    handle: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Start ticking `state` once per second
    pub fn spawn(state: Arc<AppState>) -> Self {
        let handle = tokio::spawn(clock_tick_task(state));
        Self { handle: Some(handle) }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the task and wait until it is gone
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Clock ticker ended abnormally: {}", e);
                }
            }
        }
        info!("Clock ticker stopped");
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Re-sample the clock every second until cancelled
async fn clock_tick_task(state: Arc<AppState>) {
    info!("Starting clock ticker ({}s interval)", TICK_INTERVAL.as_secs());

    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if let Err(e) = state.tick() {
            error!("Failed to update countdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{countdown::ManualClock, services::EventCatalog};

    #[tokio::test]
    async fn test_ticker_publishes_and_stops() {
        let clock = Arc::new(ManualClock::new(100));
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            clock.clone(),
            EventCatalog::default(),
            None,
        ));
        let mut rx = state.snapshot_tx.subscribe();

        clock.set(200);
        let ticker = ClockTicker::spawn(Arc::clone(&state));
        tokio::time::timeout(Duration::from_secs(3), rx.changed())
            .await
            .expect("ticker did not publish in time")
            .unwrap();
        assert_eq!(rx.borrow().current_seconds, 200);
        assert!(ticker.is_running());

        ticker.shutdown().await;
        // Only the test's references remain once the task is gone
        assert_eq!(Arc::strong_count(&state), 1);
    }
}
