//! Locked path policy.
//!
//! # Responsibilities
//! - Decide whether a route path is reserved (admin surface, catch-all)
//! - Decide whether a remote route descriptor is a locked passthrough entry
//!
//! # Design Decisions
//! - Non-root locked paths match by plain prefix ("/admin" covers "/administrator")
//! - The root "/" is the catch-all and covers only itself
//! - A descriptor without any path matcher is a catch-all, hence locked

use crate::routes::model::ValidationError;

/// Set of reserved path prefixes.
#[derive(Debug, Clone)]
pub struct LockedPaths {
    paths: Vec<String>,
}

impl LockedPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the locked path covering `path`, if any.
    pub fn covering(&self, path: &str) -> Option<&str> {
        self.paths
            .iter()
            .find(|locked| {
                if locked.as_str() == "/" {
                    path == "/"
                } else {
                    path.starts_with(locked.as_str())
                }
            })
            .map(String::as_str)
    }

    pub fn covers(&self, path: &str) -> bool {
        self.covering(path).is_some()
    }

    /// Reject a route path that falls under a locked path.
    pub fn check(&self, path: &str) -> Result<(), ValidationError> {
        match self.covering(path) {
            Some(locked) => Err(ValidationError::LockedPath {
                path: path.to_string(),
                locked: locked.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Classify a remote descriptor by its first path matcher (None = no matcher).
    pub fn covers_matcher(&self, matcher: Option<&str>) -> bool {
        match matcher {
            None => true,
            Some(pattern) => {
                let prefix = pattern.trim_end_matches('*');
                prefix.is_empty() || self.covers(prefix)
            }
        }
    }
}

impl Default for LockedPaths {
    fn default() -> Self {
        Self::new(["/admin", "/"])
    }
}
