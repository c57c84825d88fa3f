//! Signal handling for graceful shutdown and config reload.

use crate::config::{ConfigLoader, RendererConfig};
use livefeed_core::config::ConfigStore;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::{Notify, watch};

/// Spawns a task that turns process signals into actions:
///
/// - SIGTERM / SIGINT: send `true` on `shutdown_tx`
/// - SIGHUP: reload the config file and publish the new renderer timings
///
/// Only renderer timings are reloaded; input and logging settings apply at
/// startup. Returns a Notify that stops the task when signaled.
pub fn spawn_signal_handler(
    shutdown_tx: watch::Sender<bool>,
    config_loader: Arc<ConfigLoader>,
    renderer_config: ConfigStore<RendererConfig>,
) -> std::io::Result<Arc<Notify>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    let stop_notify = Arc::new(Notify::new());
    let stop_notify_clone = stop_notify.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    match config_loader.reload() {
                        Ok(loaded_config) => {
                            let version = renderer_config.update(loaded_config.renderer);
                            tracing::info!(
                                version,
                                pending_ms = loaded_config.renderer.pending_ms,
                                animation_ms = loaded_config.renderer.animation_ms,
                                "Renderer timings reloaded"
                            );
                        }
                        Err(e) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                        }
                    }
                }
                _ = stop_notify_clone.notified() => {
                    tracing::debug!("Signal handler shutting down");
                    break;
                }
            }
        }
    });

    Ok(stop_notify)
}
