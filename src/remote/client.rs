//! Config API client with timeout and error handling.
//!
//! # Responsibilities
//! - Fetch the full remote configuration tree
//! - Resolve which server's route list is managed
//! - Replace a server's route list in one call
//!
//! # Design Decisions
//! - No retries here; the reconciler decides what to do with failures
//! - Response bodies of rejected calls are surfaced as error detail

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::RemoteConfig;
use crate::remote::descriptor;
use crate::remote::types::{RemoteError, RemoteResult};

/// Transport adapter for the remote proxy's config API.
#[derive(Clone)]
pub struct ConfigClient {
    http: reqwest::Client,
    base: Url,
    server_name: Option<String>,
}

impl ConfigClient {
    /// Create a new client from configuration.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let base: Url = config
            .config_url
            .parse()
            .map_err(|_| RemoteError::InvalidUrl(config.config_url.clone()))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(config.config_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .no_proxy()
            .build()
            .map_err(|e| RemoteError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            config_url = %base,
            server_name = ?config.server_name,
            schema = descriptor::SCHEMA_VERSION,
            "Config client initialized"
        );

        Ok(Self {
            http,
            base,
            server_name: config.server_name.clone(),
        })
    }

    /// Fetch the entire configuration tree.
    pub async fn get_full_config(&self) -> RemoteResult<Value> {
        let url = self.config_url(&["config", ""])?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                detail: body,
            });
        }

        // An unconfigured remote answers `null`.
        serde_json::from_str(&body)
            .map_err(|e| RemoteError::Protocol(format!("config is not valid JSON: {}", e)))
    }

    /// Resolve the managed server in a fetched config.
    ///
    /// With `server_name` configured, that server must exist. Otherwise the config must
    /// declare exactly one server: picking "the first" of several would silently manage
    /// the wrong one.
    pub fn server_name(&self, config: &Value) -> RemoteResult<String> {
        let servers = servers(config)?;

        if let Some(name) = &self.server_name {
            return if servers.contains_key(name) {
                Ok(name.clone())
            } else {
                Err(RemoteError::Protocol(format!("server '{}' not present in remote config", name)))
            };
        }

        let mut names = servers.keys();
        match (names.next(), names.next()) {
            (Some(name), None) => Ok(name.clone()),
            (None, _) => Err(RemoteError::Protocol("remote config declares no HTTP server".to_string())),
            (Some(_), Some(_)) => Err(RemoteError::Protocol(format!(
                "remote config declares {} HTTP servers; set remote.server_name",
                servers.len()
            ))),
        }
    }

    /// Current route list of `server`. A missing or null list is empty.
    pub fn server_routes(config: &Value, server: &str) -> RemoteResult<Vec<Value>> {
        let server_config = servers(config)?
            .get(server)
            .ok_or_else(|| RemoteError::Protocol(format!("server '{}' not present in remote config", server)))?;

        match server_config.get("routes") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(routes)) => Ok(routes.clone()),
            Some(other) => Err(RemoteError::Protocol(format!(
                "routes of server '{}' is not a list: {}",
                server, other
            ))),
        }
    }

    /// Replace the full route list of `server`.
    pub async fn replace_routes(&self, server: &str, routes: &[Value]) -> RemoteResult<()> {
        let url = self.config_url(&["config", "apps", "http", "servers", server, "routes"])?;
        let response = self.http.put(url).json(routes).send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::debug!(server = %server, count = routes.len(), "Replaced remote routes");
        Ok(())
    }

    fn config_url(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl std::fmt::Debug for ConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigClient")
            .field("base", &self.base.as_str())
            .field("server_name", &self.server_name)
            .finish()
    }
}

fn servers(config: &Value) -> RemoteResult<&serde_json::Map<String, Value>> {
    match config.pointer("/apps/http/servers") {
        Some(Value::Object(servers)) => Ok(servers),
        None | Some(Value::Null) => Err(RemoteError::Protocol("remote config declares no HTTP server".to_string())),
        Some(_) => Err(RemoteError::Protocol("apps.http.servers is not an object".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(server_name: Option<&str>) -> ConfigClient {
        ConfigClient::new(&RemoteConfig {
            server_name: server_name.map(String::from),
            ..RemoteConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_config_urls() {
        let c = client(None);
        assert_eq!(c.config_url(&["config", ""]).unwrap().as_str(), "http://127.0.0.1:2019/config/");
        assert_eq!(
            c.config_url(&["config", "apps", "http", "servers", "srv 0", "routes"]).unwrap().as_str(),
            "http://127.0.0.1:2019/config/apps/http/servers/srv%200/routes"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let config = RemoteConfig {
            config_url: "mailto:admin@example.com".to_string(),
            ..RemoteConfig::default()
        };
        assert!(matches!(ConfigClient::new(&config), Err(RemoteError::InvalidUrl(_))));
    }

    #[test]
    fn test_server_name_resolution() {
        let single = json!({ "apps": { "http": { "servers": { "srv0": {} } } } });
        let multi = json!({ "apps": { "http": { "servers": { "a": {}, "b": {} } } } });
        let none = json!({ "apps": {} });

        assert_eq!(client(None).server_name(&single).unwrap(), "srv0");
        assert!(matches!(client(None).server_name(&multi), Err(RemoteError::Protocol(_))));
        assert!(matches!(client(None).server_name(&none), Err(RemoteError::Protocol(_))));
        assert!(matches!(client(None).server_name(&Value::Null), Err(RemoteError::Protocol(_))));

        assert_eq!(client(Some("b")).server_name(&multi).unwrap(), "b");
        assert!(matches!(client(Some("c")).server_name(&multi), Err(RemoteError::Protocol(_))));
    }

    #[test]
    fn test_server_routes() {
        let config = json!({ "apps": { "http": { "servers": {
            "empty": {},
            "null": { "routes": null },
            "some": { "routes": [{ "handle": [] }] },
            "bad": { "routes": "oops" }
        } } } });

        assert!(ConfigClient::server_routes(&config, "empty").unwrap().is_empty());
        assert!(ConfigClient::server_routes(&config, "null").unwrap().is_empty());
        assert_eq!(ConfigClient::server_routes(&config, "some").unwrap().len(), 1);
        assert!(matches!(ConfigClient::server_routes(&config, "bad"), Err(RemoteError::Protocol(_))));
        assert!(matches!(ConfigClient::server_routes(&config, "missing"), Err(RemoteError::Protocol(_))));
    }
}
