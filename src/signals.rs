//! Process signal handling
//!
//! SIGHUP re-reads configuration from the environment and swaps it in
//! without dropping the listener. SIGTERM and SIGINT end the server after
//! in-flight requests finish.

use crate::config::ConfigHandle;
use std::future::Future;
use tokio::signal::unix::{signal, SignalKind};

/// Reload configuration on every SIGHUP for the life of the process
pub fn spawn_reload_on_sighup(config: ConfigHandle) -> std::io::Result<()> {
    let mut sighup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while sighup.recv().await.is_some() {
            tracing::info!("Received SIGHUP - reloading configuration");
            if let Err(e) = config.reload_from_env() {
                tracing::error!(error = %e, "Configuration reload failed, keeping previous settings");
            }
        }
    });
    Ok(())
}

/// Future that resolves once the server should shut down
///
/// Handlers are installed before returning so an early signal is not lost.
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM - shutting down");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT - shutting down");
            }
        }
    })
}
