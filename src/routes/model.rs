//! Route records and input validation.

use std::str::FromStr;

use axum::http::uri::PathAndQuery;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Observable state of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    /// Created, not yet applied or probed.
    #[default]
    Pending,
    /// Applied and the last probe succeeded.
    Active,
    /// Apply failed, or the last probe failed.
    Failed,
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteStatus::Pending => write!(f, "pending"),
            RouteStatus::Active => write!(f, "active"),
            RouteStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A desired path-prefix to upstream mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Route {
    /// Path prefix (e.g., "/blog"). Unique across the store.
    pub path: String,

    /// Upstream address (e.g., "10.0.0.1:8080").
    pub target: String,

    #[serde(default)]
    pub status: RouteStatus,

    /// Result of the most recent health probe.
    #[serde(default)]
    pub alive: bool,

    /// Reason the last apply failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Route {
    /// Create a pending route. Does not validate.
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
            status: RouteStatus::Pending,
            alive: false,
            error: None,
        }
    }

    /// A route whose last apply failed is kept out of the remote until reloaded.
    pub fn is_inert(&self) -> bool {
        self.error.is_some()
    }
}

/// Input rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("path must not be empty")]
    EmptyPath,

    #[error("path '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("path '{0}' is not a valid URI path")]
    InvalidPath(String),

    #[error("target must not be empty")]
    EmptyTarget,

    #[error("path '{path}' is reserved by locked path '{locked}'")]
    LockedPath { path: String, locked: String },

    #[error("a route for path '{0}' already exists")]
    DuplicateRoute(String),
}

/// Check the structural shape of a path and target.
pub fn validate_shape(path: &str, target: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(ValidationError::MissingLeadingSlash(path.to_string()));
    }
    // Query and fragment would end up inside the remote path matcher.
    if path.contains(['?', '#']) || PathAndQuery::from_str(path).is_err() {
        return Err(ValidationError::InvalidPath(path.to_string()));
    }
    if target.trim().is_empty() {
        return Err(ValidationError::EmptyTarget);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        assert_eq!(validate_shape("", "a:1"), Err(ValidationError::EmptyPath));
        assert_eq!(
            validate_shape("blog", "a:1"),
            Err(ValidationError::MissingLeadingSlash("blog".into()))
        );
        assert_eq!(validate_shape("/blog", "  "), Err(ValidationError::EmptyTarget));
        for path in ["/my blog", "/a?b=1", "/a#top", "/tab\there"] {
            assert_eq!(
                validate_shape(path, "a:1"),
                Err(ValidationError::InvalidPath(path.into())),
                "{}",
                path
            );
        }
        assert!(validate_shape("/api/v2-beta_1.0", "a:1").is_ok());
        assert!(validate_shape("/blog", "10.0.0.1:8080").is_ok());
    }

    #[test]
    fn test_persisted_shape() {
        let route = Route::new("/blog", "10.0.0.1:8080");
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "/blog",
                "target": "10.0.0.1:8080",
                "status": "pending",
                "alive": false
            })
        );

        // Files written by older revisions may omit status fields.
        let parsed: Route =
            serde_json::from_str(r#"{"path":"/a","target":"b:1","status":"failed","error":"boom"}"#)
                .unwrap();
        assert_eq!(parsed.status, RouteStatus::Failed);
        assert!(!parsed.alive);
        assert!(parsed.is_inert());
    }
}
