//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the engine from validated configuration
//! - Replay persisted desired state onto the remote
//! - Start background tasks (reconcile worker, health monitor)
//!
//! # Design Decisions
//! - Fail fast on local problems (unreadable routes file, bad URLs)
//! - Remote problems at startup are logged; routes carry the failure

use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::health::{HealthChecker, HealthMonitor};
use crate::lifecycle::Shutdown;
use crate::reconcile::{self, Reconciler, ReconcilerHandle};
use crate::remote::{ConfigClient, RemoteError};
use crate::routes::{LockedPaths, RouteStore, StoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load routes: {0}")]
    Store(#[from] StoreError),

    #[error("failed to create config client: {0}")]
    Remote(#[from] RemoteError),
}

/// Running engine tasks.
pub struct Engine {
    pub handle: ReconcilerHandle,
    pub worker: JoinHandle<()>,
    pub monitor: JoinHandle<()>,
}

/// Build a reconciler from configuration, loading persisted routes.
pub fn build_reconciler(config: &SyncConfig) -> Result<Reconciler, StartupError> {
    let locked = LockedPaths::new(config.locked.paths.iter().cloned());
    let store = RouteStore::load(&PathBuf::from(&config.store.path), &locked)?;
    let client = ConfigClient::new(&config.remote)?;
    let health = HealthChecker::new(&config.health_check);

    Ok(Reconciler::new(store, client, health, locked))
}

/// Spawn the worker and health monitor, replaying desired state first if configured.
pub async fn start_engine(config: &SyncConfig, shutdown: &Shutdown) -> Result<Engine, StartupError> {
    let reconciler = build_reconciler(config)?;
    let (handle, worker) = reconcile::spawn(reconciler, config.engine.queue_depth, shutdown.subscribe());

    if config.engine.reload_on_startup {
        match handle.reload().await {
            Ok(report) if report.failed.is_empty() => {
                tracing::info!(applied = report.applied, "Desired state replayed onto remote");
            }
            Ok(report) => {
                for failed in &report.failed {
                    tracing::warn!(path = %failed.path, error = %failed.error, "Route not replayed at startup");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Startup reload failed; routes marked failed until the next reload");
            }
        }
    }

    let monitor = HealthMonitor::new(handle.clone(), config.health_check.clone());
    let monitor = tokio::spawn(monitor.run(shutdown.subscribe()));

    Ok(Engine {
        handle,
        worker,
        monitor,
    })
}
