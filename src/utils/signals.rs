//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait until SIGTERM or SIGINT arrives and return which one it was
pub async fn shutdown_signal() -> std::io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    let signal = signals.next().await.unwrap_or(SIGTERM);
    info!("Received signal: {}", signal);

    handle.close();
    Ok(signal)
}
