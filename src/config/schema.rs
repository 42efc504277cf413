//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the route sync service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Admin HTTP front end.
    pub admin: AdminConfig,

    /// Remote proxy config API.
    pub remote: RemoteConfig,

    /// Health probing through the proxy's public listener.
    pub health_check: HealthCheckConfig,

    /// Desired-state persistence.
    pub store: StoreConfig,

    /// Reserved path prefixes.
    pub locked: LockedConfig,

    /// Reconciliation worker settings.
    pub engine: EngineConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Admin front end configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Bind address (e.g., "127.0.0.1:4000").
    pub bind_address: String,

    /// Directory with the admin UI, served under /admin.
    pub static_dir: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:4000".to_string(),
            static_dir: None,
            request_timeout_secs: 60,
        }
    }
}

/// Remote config API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the config API (e.g., "http://127.0.0.1:2019").
    pub config_url: String,

    /// Server whose route list is managed.
    ///
    /// When unset, the remote must declare exactly one server.
    pub server_name: Option<String>,

    /// Total timeout per config API call in milliseconds.
    pub timeout_ms: u64,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            config_url: "http://127.0.0.1:2019".to_string(),
            server_name: None,
            timeout_ms: 10_000,
            connect_timeout_ms: 2_000,
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Public listener of the proxy (e.g., "http://127.0.0.1:3000").
    pub proxy_url: String,

    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Enable periodic background refresh.
    pub refresh_enabled: bool,

    /// Background refresh interval in seconds.
    pub refresh_interval_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:3000".to_string(),
            timeout_ms: 2_000,
            refresh_enabled: false,
            refresh_interval_secs: 30,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the routes file.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "./routes.json".to_string(),
        }
    }
}

/// Locked path configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LockedConfig {
    /// Prefixes never created, changed or removed by the engine.
    pub paths: Vec<String>,
}

impl Default for LockedConfig {
    fn default() -> Self {
        Self {
            paths: vec!["/admin".to_string(), "/".to_string()],
        }
    }
}

/// Reconciliation worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum queued commands before callers wait.
    pub queue_depth: usize,

    /// Replay persisted routes onto the remote at startup.
    pub reload_on_startup: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_depth: 64,
            reload_on_startup: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
