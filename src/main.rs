//! On-Air Countdown - A broadcast countdown-timer server
//!
//! This is the main entry point for the on-air-countdown application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use on_air_countdown::{
    api::create_router,
    config::Config,
    countdown::SystemClock,
    services::CatalogStore,
    state::AppState,
    tasks::ClockTicker,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("on_air_countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting on-air-countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, events={}",
          config.host, config.port, config.events_file.display());

    let store = CatalogStore::new(config.events_file.clone());
    let catalog = store.load()?;

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Arc::new(SystemClock),
        catalog,
        Some(store),
    ));

    if config.start.is_some() || config.end.is_some() {
        let snapshot = state.configure_times(config.start.clone(), config.end.clone())?;
        info!("Startup times: start='{}' end='{}'", snapshot.start_time, snapshot.end_time);
    }

    // Start sampling the wall clock once per second
    let ticker = ClockTicker::spawn(Arc::clone(&state));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /countdown                - Current countdown");
    info!("  GET    /countdown/stream         - Countdown as server-sent events");
    info!("  PUT    /countdown/times          - Set start/end time");
    info!("  POST   /countdown/reset          - Re-sample the clock");
    info!("  POST   /countdown/reset-defaults - Restore the event's default times");
    info!("  GET    /events                   - List events");
    info!("  POST   /events                   - Add an event");
    info!("  PUT    /events/:id               - Update an event");
    info!("  DELETE /events/:id               - Delete an event");
    info!("  POST   /events/:id/select        - Select the current event");
    info!("  GET    /events/export            - Export events as JSON");
    info!("  POST   /events/import            - Import events from JSON");
    info!("  GET    /status                   - Server status");
    info!("  GET    /health                   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            if let Err(e) = signal {
                tracing::error!("Signal handler failed: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    ticker.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
