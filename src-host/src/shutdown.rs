use std::time::Duration;

use notify_stack::NotificationService;
use tokio::task::JoinHandle;

use crate::app::HostState;

/// Time the stdout writer gets to flush the final close events.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn graceful_shutdown(state: HostState, service: NotificationService, writer: JoinHandle<()>) {
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();

    service.shutdown().await;
    tracing::info!("Shutdown: notification engine stopped");

    // Forwarders end once their event streams close; the writer ends when the
    // last output sender is gone.
    drop(state);
    match tokio::time::timeout(OUTPUT_DRAIN_TIMEOUT, writer).await {
        Ok(Ok(())) => tracing::info!("Shutdown: output flushed"),
        Ok(Err(e)) => tracing::warn!("Shutdown: output writer failed: {e}"),
        Err(_) => tracing::warn!("Shutdown: output writer did not finish in time"),
    }

    tracing::info!("Shutdown sequence completed");
}
