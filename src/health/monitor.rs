//! Periodic health refresh.
//!
//! # Responsibilities
//! - Periodically ask the reconcile worker to re-probe every route
//! - Stop on shutdown

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::reconcile::ReconcilerHandle;

pub struct HealthMonitor {
    handle: ReconcilerHandle,
    config: HealthCheckConfig,
}

impl HealthMonitor {
    pub fn new(handle: ReconcilerHandle, config: HealthCheckConfig) -> Self {
        Self { handle, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.refresh_enabled {
            tracing::info!("Periodic health refresh disabled");
            return;
        }

        tracing::info!(
            interval = self.config.refresh_interval_secs,
            proxy_url = %self.config.proxy_url,
            "Health monitor starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.refresh_interval_secs));
        // The first tick fires immediately; startup already probed during reload.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.handle.list_routes().await {
                        Ok(routes) => tracing::debug!(routes = routes.len(), "Health refresh complete"),
                        Err(e) => {
                            tracing::warn!(error = %e, "Health refresh failed");
                            if matches!(e, crate::reconcile::ReconcileError::WorkerStopped) {
                                break;
                            }
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
