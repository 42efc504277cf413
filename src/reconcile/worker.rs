//! Serialized command queue in front of the `Reconciler`.
//!
//! # Responsibilities
//! - Own the `Reconciler` (and with it the store) on a single task
//! - Accept commands from any number of `ReconcilerHandle` clones
//! - Run each command to completion before taking the next
//!
//! # Design Decisions
//! - Bounded queue: callers wait instead of piling up work
//! - Shutdown stops the worker between commands, never mid-operation
//! - Each command runs in its own span with a fresh operation ID

use std::time::Instant;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::reconciler::{Reconciler, ReloadReport};
use crate::reconcile::status;
use crate::routes::Route;

type Reply<T> = oneshot::Sender<ReconcileResult<T>>;

enum Command {
    List { refresh: bool, reply: Reply<Vec<Route>> },
    Add { path: String, target: String, reply: Reply<Route> },
    Remove { index: usize, reply: Reply<Route> },
    Reload { reply: Reply<ReloadReport> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::List { refresh: true, .. } => "refresh",
            Command::List { refresh: false, .. } => "snapshot",
            Command::Add { .. } => "apply",
            Command::Remove { .. } => "remove",
            Command::Reload { .. } => "reload",
        }
    }
}

/// Cloneable entry point to the reconcile worker.
#[derive(Clone, Debug)]
pub struct ReconcilerHandle {
    tx: mpsc::Sender<Command>,
}

impl ReconcilerHandle {
    /// Refresh health of every route and return them.
    pub async fn list_routes(&self) -> ReconcileResult<Vec<Route>> {
        self.request(|reply| Command::List { refresh: true, reply }).await
    }

    /// Current routes without probing.
    pub async fn routes(&self) -> ReconcileResult<Vec<Route>> {
        self.request(|reply| Command::List { refresh: false, reply }).await
    }

    pub async fn add_route(&self, path: impl Into<String>, target: impl Into<String>) -> ReconcileResult<Route> {
        let (path, target) = (path.into(), target.into());
        self.request(|reply| Command::Add { path, target, reply }).await
    }

    pub async fn remove_route(&self, index: usize) -> ReconcileResult<Route> {
        self.request(|reply| Command::Remove { index, reply }).await
    }

    pub async fn reload(&self) -> ReconcileResult<ReloadReport> {
        self.request(|reply| Command::Reload { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> ReconcileResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| ReconcileError::WorkerStopped)?;
        rx.await.map_err(|_| ReconcileError::WorkerStopped)?
    }
}

/// Start the worker owning `reconciler`.
///
/// The worker exits on shutdown or once every handle is dropped.
pub fn spawn(
    reconciler: Reconciler,
    queue_depth: usize,
    shutdown: broadcast::Receiver<()>,
) -> (ReconcilerHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(queue_depth.max(1));
    let task = tokio::spawn(run(reconciler, rx, shutdown));
    (ReconcilerHandle { tx }, task)
}

async fn run(mut reconciler: Reconciler, mut rx: mpsc::Receiver<Command>, mut shutdown: broadcast::Receiver<()>) {
    tracing::info!(routes = reconciler.routes().len(), "Reconcile worker started");

    loop {
        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(cmd) => execute(&mut reconciler, cmd).await,
                None => {
                    tracing::info!("All reconciler handles dropped, worker exiting");
                    break;
                }
            },
            _ = shutdown.recv() => {
                tracing::info!("Reconcile worker received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

async fn execute(reconciler: &mut Reconciler, cmd: Command) {
    let op = cmd.name();
    let span = tracing::info_span!("reconcile", op, op_id = %Uuid::new_v4());

    async move {
        let started = Instant::now();
        match cmd {
            Command::List { refresh, reply } => {
                let result = if refresh {
                    reconciler.refresh_health().await
                } else {
                    Ok(reconciler.routes().to_vec())
                };
                finish(op, started, result, reply);
            }
            Command::Add { path, target, reply } => {
                let result = reconciler.apply(&path, &target).await;
                finish(op, started, result, reply);
            }
            Command::Remove { index, reply } => {
                let result = reconciler.remove(index).await;
                finish(op, started, result, reply);
            }
            Command::Reload { reply } => {
                let result = reconciler.reload().await;
                finish(op, started, result, reply);
            }
        }
        metrics::record_route_counts(&status::tally(reconciler.routes()));
    }
    .instrument(span)
    .await
}

fn finish<T>(op: &'static str, started: Instant, result: ReconcileResult<T>, reply: Reply<T>) {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(ReconcileError::Validation(_)) | Err(ReconcileError::NotFound(_)) => "rejected",
        Err(_) => "error",
    };
    metrics::record_operation(op, outcome, started);

    match &result {
        Ok(_) => tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Operation completed"),
        Err(e) if outcome == "rejected" => tracing::info!(error = %e, "Operation rejected"),
        Err(e) => tracing::warn!(error = %e, "Operation failed"),
    }

    if reply.send(result).is_err() {
        tracing::debug!("Caller went away before the reply");
    }
}
