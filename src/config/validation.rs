//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Validate value ranges (timeouts > 0)
//! - Validate locked paths are absolute
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SyncConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::SyncConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &SyncConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "admin.bind_address",
            format!("'{}' is not a socket address", config.admin.bind_address),
        ));
    }
    if config.admin.request_timeout_secs == 0 {
        errors.push(ValidationError::new("admin.request_timeout_secs", "must be greater than 0"));
    }

    check_url(&mut errors, "remote.config_url", &config.remote.config_url, &["http", "https"]);
    if config.remote.timeout_ms == 0 {
        errors.push(ValidationError::new("remote.timeout_ms", "must be greater than 0"));
    }
    if config.remote.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("remote.connect_timeout_ms", "must be greater than 0"));
    }
    if matches!(config.remote.server_name.as_deref(), Some("")) {
        errors.push(ValidationError::new("remote.server_name", "must not be empty when set"));
    }

    // Probes use a plain-HTTP connector.
    check_url(&mut errors, "health_check.proxy_url", &config.health_check.proxy_url, &["http"]);
    if config.health_check.timeout_ms == 0 {
        errors.push(ValidationError::new("health_check.timeout_ms", "must be greater than 0"));
    }
    if config.health_check.refresh_enabled && config.health_check.refresh_interval_secs == 0 {
        errors.push(ValidationError::new(
            "health_check.refresh_interval_secs",
            "must be greater than 0 when refresh is enabled",
        ));
    }

    if config.store.path.trim().is_empty() {
        errors.push(ValidationError::new("store.path", "must not be empty"));
    }

    for path in &config.locked.paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "locked.paths",
                format!("'{}' must start with '/'", path),
            ));
        }
    }

    if config.engine.queue_depth == 0 {
        errors.push(ValidationError::new("engine.queue_depth", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, schemes: &[&str]) {
    match Url::parse(value) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}
