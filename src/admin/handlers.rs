use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::error::ApiError;
use crate::reconcile::{ReconcilerHandle, ReloadReport};
use crate::routes::Route;

/// Body of `POST /admin/api/routes`. Missing fields are validated by the engine.
#[derive(Debug, Deserialize)]
pub struct NewRoute {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct Removed {
    pub status: &'static str,
    pub removed: Route,
}

pub async fn list_routes(State(handle): State<ReconcilerHandle>) -> Result<Json<Vec<Route>>, ApiError> {
    Ok(Json(handle.list_routes().await?))
}

pub async fn add_route(
    State(handle): State<ReconcilerHandle>,
    Json(body): Json<NewRoute>,
) -> Result<Json<Route>, ApiError> {
    Ok(Json(handle.add_route(body.path, body.target).await?))
}

pub async fn remove_route(
    State(handle): State<ReconcilerHandle>,
    Path(index): Path<usize>,
) -> Result<Json<Removed>, ApiError> {
    let removed = handle.remove_route(index).await?;
    Ok(Json(Removed { status: "ok", removed }))
}

pub async fn reload(State(handle): State<ReconcilerHandle>) -> Result<Json<ReloadReport>, ApiError> {
    Ok(Json(handle.reload().await?))
}
