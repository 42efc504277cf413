//! Read-filter-merge-write reconciliation against the remote config API.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::plan::{self, Partition};
use crate::reconcile::status;
use crate::health::HealthChecker;
use crate::remote::{ConfigClient, RemoteResult};
use crate::routes::model::validate_shape;
use crate::routes::{LockedPaths, Route, RouteStore, ValidationError};

/// Outcome of a full resynchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadReport {
    /// Routes written to the remote.
    pub applied: usize,

    /// Routes whose write failed, in store order.
    pub failed: Vec<FailedRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRoute {
    pub index: usize,
    pub path: String,
    pub error: String,
}

/// Keeps the remote route list aligned with the desired routes in `RouteStore`.
///
/// Not synchronized: run it behind `reconcile::spawn`, which serializes every
/// operation on one worker.
#[derive(Debug)]
pub struct Reconciler {
    store: RouteStore,
    client: ConfigClient,
    health: HealthChecker,
    locked: LockedPaths,
}

impl Reconciler {
    pub fn new(store: RouteStore, client: ConfigClient, health: HealthChecker, locked: LockedPaths) -> Self {
        Self {
            store,
            client,
            health,
            locked,
        }
    }

    pub fn routes(&self) -> &[Route] {
        self.store.routes()
    }

    /// Add a route and write it to the remote.
    ///
    /// Validation failures touch nothing. A remote failure leaves the route in the
    /// store as failed and inert, and is returned.
    pub async fn apply(&mut self, path: &str, target: &str) -> ReconcileResult<Route> {
        validate_shape(path, target)?;
        self.locked.check(path)?;
        if self.store.contains_path(path) {
            return Err(ValidationError::DuplicateRoute(path.to_string()).into());
        }

        let index = self.store.push(Route::new(path, target));
        if let Err(e) = self.store.persist() {
            self.store.remove(index);
            return Err(e.into());
        }

        let desired: Vec<&Route> = self.store.routes().iter().filter(|r| !r.is_inert()).collect();
        let outcome = self.write(desired).await;
        match outcome {
            Ok(()) => {
                let alive = self.health.probe(path).await;
                let route = self.route_mut(index)?;
                status::applied(route, alive);
                let route = route.clone();
                self.store.persist()?;

                tracing::info!(path = %route.path, target = %route.target, status = %route.status, "Route applied");
                Ok(route)
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Route apply failed");
                status::apply_failed(self.route_mut(index)?, e.to_string());
                self.store.persist()?;
                Err(e.into())
            }
        }
    }

    /// Remove the route at `index` from the remote, then from the store.
    ///
    /// A remote failure leaves the store unchanged.
    pub async fn remove(&mut self, index: usize) -> ReconcileResult<Route> {
        let route = self.store.get(index).ok_or(ReconcileError::NotFound(index))?;
        // Locked paths never enter the store; reaching this means the store was tampered with.
        self.locked.check(&route.path)?;

        let desired: Vec<&Route> = self
            .store
            .routes()
            .iter()
            .enumerate()
            .filter(|(i, r)| *i != index && !r.is_inert())
            .map(|(_, r)| r)
            .collect();
        self.write(desired).await?;

        let removed = self.store.remove(index).ok_or(ReconcileError::NotFound(index))?;
        self.store.persist()?;

        tracing::info!(path = %removed.path, index, "Route removed");
        Ok(removed)
    }

    /// Clear all remote business routes, then re-apply every stored route in order.
    ///
    /// Each route is attempted independently; failures are recorded on the route and
    /// collected in the report. Only a failure of the clearing step is returned as an error.
    /// Nothing reached the remote in that case, so routes are left as they were.
    pub async fn reload(&mut self) -> ReconcileResult<ReloadReport> {
        let cleared = self.write(Vec::new()).await;
        if let Err(e) = cleared {
            tracing::warn!(error = %e, "Reload could not clear remote business routes");
            return Err(e.into());
        }

        let mut report = ReloadReport::default();
        let mut applied: Vec<usize> = Vec::new();

        for index in 0..self.store.len() {
            let desired: Vec<&Route> = applied
                .iter()
                .chain(std::iter::once(&index))
                .filter_map(|&i| self.store.get(i))
                .collect();
            let outcome = self.write(desired).await;

            match outcome {
                Ok(()) => {
                    applied.push(index);
                    let path = self.route_mut(index)?.path.clone();
                    let alive = self.health.probe(&path).await;
                    status::applied(self.route_mut(index)?, alive);
                    report.applied += 1;
                }
                Err(e) => {
                    let route = self.route_mut(index)?;
                    tracing::warn!(path = %route.path, error = %e, "Route re-apply failed during reload");
                    status::apply_failed(route, e.to_string());
                    report.failed.push(FailedRoute {
                        index,
                        path: route.path.clone(),
                        error: e.to_string(),
                    });
                }
            }
            self.store.persist()?;
        }

        tracing::info!(applied = report.applied, failed = report.failed.len(), "Reload finished");
        Ok(report)
    }

    /// Probe every route concurrently, re-derive statuses and persist.
    pub async fn refresh_health(&mut self) -> ReconcileResult<Vec<Route>> {
        let health = &self.health;
        let probes: Vec<_> = self
            .store
            .routes()
            .iter()
            .map(|r| {
                let path = r.path.clone();
                async move { health.probe(&path).await }
            })
            .collect();
        let results = join_all(probes).await;

        for (route, alive) in self.store.routes_mut().iter_mut().zip(results) {
            status::probed(route, alive);
        }
        self.store.persist()?;

        Ok(self.store.routes().to_vec())
    }

    async fn fetch(&self) -> RemoteResult<(String, Partition)> {
        let config = self.client.get_full_config().await?;
        let server = self.client.server_name(&config)?;
        let remote = ConfigClient::server_routes(&config, &server)?;
        Ok((server, plan::partition(remote, &self.locked)))
    }

    /// One read-filter-merge-write cycle with `desired` (in store order) as the business set.
    async fn write(&self, desired: Vec<&Route>) -> RemoteResult<()> {
        let (server, parts) = self.fetch().await?;
        let discarded = parts.business.len();
        let list = plan::compose(desired, &parts.locked);

        tracing::debug!(
            server = %server,
            locked = parts.locked.len(),
            discarded,
            written = list.len(),
            "Writing remote route list"
        );
        self.client.replace_routes(&server, &list).await
    }

    fn route_mut(&mut self, index: usize) -> ReconcileResult<&mut Route> {
        self.store.get_mut(index).ok_or(ReconcileError::NotFound(index))
    }
}
