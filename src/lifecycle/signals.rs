//! OS signal wiring.
//!
//! Implements the "stop on process shutdown" flag: a watcher task that
//! translates the process interrupt signal into the internal shutdown
//! broadcast, so the listener never outlives the process.

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Install the stop-on-process-shutdown hook.
///
/// The returned handle can be aborted if the server stops before the process
/// does.
pub fn install_stop_on_shutdown(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("process shutdown signal received");
                shutdown.trigger();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install shutdown signal handler");
            }
        }
    })
}
