//! Signal handling for long-running subcommands.

use std::future::Future;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;

/// Install SIGTERM and SIGINT handlers and return a future that completes
/// when either arrives.
///
/// Installation errors are returned to the caller instead of being treated
/// as a shutdown request.
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send + 'static> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating graceful shutdown");
            }
        }
    })
}

/// Spawns a task that flips the returned receiver to `true` on SIGTERM or
/// SIGINT.
pub fn spawn_shutdown_watch() -> std::io::Result<watch::Receiver<bool>> {
    Ok(watch_until(shutdown_signal()?))
}

fn watch_until<F>(trigger: F) -> watch::Receiver<bool>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        trigger.await;
        let _ = shutdown_tx.send(true);
    });

    shutdown_rx
}
