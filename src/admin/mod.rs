//! Admin HTTP front end.
//!
//! # Routes
//! - `GET    /admin/api/routes`          list routes (refreshes health)
//! - `POST   /admin/api/routes`          add a route `{path, target}`
//! - `DELETE /admin/api/routes/{index}`  remove a route by store index
//! - `POST   /admin/api/reload`          full resynchronization
//! - `GET    /admin/*`                   static admin UI, when configured
//!
//! Handlers only translate HTTP to `ReconcilerHandle` calls.

pub mod error;
pub mod handlers;

use std::time::Duration;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use self::handlers::*;
use crate::config::AdminConfig;
use crate::reconcile::ReconcilerHandle;

/// Build the admin router.
#[allow(deprecated)]
pub fn setup_admin_router(handle: ReconcilerHandle, config: &AdminConfig) -> Router {
    let api = Router::new()
        .route("/routes", get(list_routes).post(add_route))
        .route("/routes/{index}", delete(remove_route))
        .route("/reload", post(reload))
        .with_state(handle);

    let mut router = Router::new().nest("/admin/api", api);
    if let Some(dir) = &config.static_dir {
        tracing::info!(static_dir = %dir, "Serving admin UI");
        router = router.nest_service("/admin", ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
    )
}
