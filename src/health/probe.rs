//! Active route probing through the proxy's public listener.

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::config::HealthCheckConfig;

/// Verifies that traffic for a path actually reaches a live upstream.
#[derive(Clone)]
pub struct HealthChecker {
    client: Client<HttpConnector, Body>,
    proxy_url: String,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(config: &HealthCheckConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            client,
            proxy_url: config.proxy_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Probe `path`. Healthy iff a response with status < 500 arrives in time.
    pub async fn probe(&self, path: &str) -> bool {
        let uri = format!("{}{}", self.proxy_url, path);

        let request = match Request::builder()
            .method("GET")
            .uri(&uri)
            .header("user-agent", "route-sync-health-check")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "Failed to build health probe request");
                return false;
            }
        };

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                let healthy = status.as_u16() < 500;
                if !healthy {
                    tracing::warn!(path = %path, status = %status, "Health probe failed: server error");
                }
                healthy
            }
            Ok(Err(e)) => {
                tracing::warn!(path = %path, error = %e, "Health probe failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(path = %path, timeout_ms = self.timeout.as_millis() as u64, "Health probe failed: timeout");
                false
            }
        }
    }
}

impl std::fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthChecker")
            .field("proxy_url", &self.proxy_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
