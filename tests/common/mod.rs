//! Shared utilities for integration tests.
//!
//! `MockProxy` stands in for the remote reverse proxy: a config API holding one
//! JSON config tree, and a public listener that routes probes through the
//! current route list.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path as UrlPath, State},
    http::{StatusCode, Uri},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use route_sync::config::SyncConfig;
use route_sync::lifecycle::startup::build_reconciler;
use route_sync::reconcile::Reconciler;
use route_sync::remote::descriptor;
use route_sync::routes::LockedPaths;

pub const SERVER: &str = "srv0";

pub fn admin_entry() -> Value {
    json!({
        "match": [{ "path": ["/admin*"] }],
        "handle": [{ "handler": "reverse_proxy", "upstreams": [{ "dial": "127.0.0.1:4000" }] }]
    })
}

pub fn catch_all_entry() -> Value {
    json!({ "handle": [{ "handler": "file_server", "root": "/srv/www" }] })
}

struct MockState {
    config: Value,
    puts: usize,
    reject_dial: Option<String>,
    down: HashSet<String>,
}

#[derive(Clone)]
pub struct MockProxy {
    pub config_url: String,
    pub public_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProxy {
    /// Start a proxy with one server holding the admin route and a catch-all.
    pub async fn start() -> Self {
        Self::start_with(json!({
            "apps": { "http": { "servers": {
                "srv0": { "listen": [":3000"], "routes": [admin_entry(), catch_all_entry()] }
            } } }
        }))
        .await
    }

    pub async fn start_with(config: Value) -> Self {
        let state = Arc::new(Mutex::new(MockState {
            config,
            puts: 0,
            reject_dial: None,
            down: HashSet::new(),
        }));

        let admin = Router::new()
            .route("/config/", get(get_config))
            .route("/config/apps/http/servers/{server}/routes", put(put_routes))
            .with_state(state.clone());
        let public = Router::new().fallback(public_handler).with_state(state.clone());

        Self {
            config_url: serve(admin).await,
            public_url: serve(public).await,
            state,
        }
    }

    pub fn routes(&self) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state
            .config
            .pointer(&format!("/apps/http/servers/{}/routes", SERVER))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_routes(&self, routes: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        state.config["apps"]["http"]["servers"][SERVER]["routes"] = Value::Array(routes);
    }

    /// Entries the default locked policy treats as locked, in remote order.
    pub fn locked_entries(&self) -> Vec<Value> {
        let locked = LockedPaths::default();
        self.routes()
            .into_iter()
            .filter(|r| locked.covers_matcher(descriptor::matcher_path(r)))
            .collect()
    }

    pub fn business_entries(&self) -> Vec<Value> {
        let locked = LockedPaths::default();
        self.routes()
            .into_iter()
            .filter(|r| !locked.covers_matcher(descriptor::matcher_path(r)))
            .collect()
    }

    /// Matcher paths of business entries, in remote order.
    pub fn business_paths(&self) -> Vec<String> {
        self.business_entries()
            .iter()
            .filter_map(|r| descriptor::matcher_path(r).map(String::from))
            .collect()
    }

    pub fn put_count(&self) -> usize {
        self.state.lock().unwrap().puts
    }

    /// Reject any write containing a route dialing `dial`.
    pub fn reject_dial(&self, dial: Option<&str>) {
        self.state.lock().unwrap().reject_dial = dial.map(String::from);
    }

    /// Make the upstream `dial` answer 502 through the public listener.
    pub fn set_down(&self, dial: &str, down: bool) {
        let mut state = self.state.lock().unwrap();
        if down {
            state.down.insert(dial.to_string());
        } else {
            state.down.remove(dial);
        }
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

async fn get_config(State(state): State<Arc<Mutex<MockState>>>) -> Json<Value> {
    Json(state.lock().unwrap().config.clone())
}

async fn put_routes(
    State(state): State<Arc<Mutex<MockState>>>,
    UrlPath(server): UrlPath<String>,
    Json(routes): Json<Vec<Value>>,
) -> (StatusCode, String) {
    let mut state = state.lock().unwrap();

    if state.config.pointer(&format!("/apps/http/servers/{}", server)).is_none() {
        return (StatusCode::NOT_FOUND, format!("unknown server {}", server));
    }
    if let Some(dial) = &state.reject_dial {
        if routes.iter().any(|r| descriptor::upstream_dial(r) == Some(dial.as_str())) {
            return (StatusCode::BAD_REQUEST, format!("upstream {} rejected", dial));
        }
    }

    state.config["apps"]["http"]["servers"][server.as_str()]["routes"] = Value::Array(routes);
    state.puts += 1;
    (StatusCode::OK, String::new())
}

async fn public_handler(State(state): State<Arc<Mutex<MockState>>>, uri: Uri) -> StatusCode {
    let state = state.lock().unwrap();
    let routes = state
        .config
        .pointer(&format!("/apps/http/servers/{}/routes", SERVER))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let matched = routes.iter().find(|r| match descriptor::matcher_path(r) {
        None => true,
        Some(pattern) => uri.path().starts_with(pattern.trim_end_matches('*')),
    });

    match matched.and_then(descriptor::upstream_dial) {
        Some(dial) if state.down.contains(dial) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    }
}

/// Config pointing at `mock`, persisting under `dir`.
pub fn sync_config(mock: &MockProxy, dir: &Path) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.remote.config_url = mock.config_url.clone();
    config.remote.timeout_ms = 2_000;
    config.health_check.proxy_url = mock.public_url.clone();
    config.health_check.timeout_ms = 1_000;
    config.store.path = dir.join("routes.json").to_string_lossy().into_owned();
    config.engine.reload_on_startup = false;
    config
}

pub fn reconciler(mock: &MockProxy, dir: &Path) -> Reconciler {
    build_reconciler(&sync_config(mock, dir)).unwrap()
}

/// An address nothing listens on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
