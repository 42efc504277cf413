//! Desired-state storage and persistence.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::routes::locked::LockedPaths;
use crate::routes::model::{validate_shape, Route};

/// Errors reading or writing the routes file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("routes file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("routes file is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ordered sequence of desired routes.
///
/// Owned by the reconcile worker; all mutation goes through its methods.
#[derive(Debug, Default)]
pub struct RouteStore {
    routes: Vec<Route>,
    persistence_path: Option<PathBuf>,
}

impl RouteStore {
    /// Create an empty store persisting to `path` (None = memory only).
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            routes: Vec::new(),
            persistence_path,
        }
    }

    /// Load from file if it exists, otherwise start empty.
    ///
    /// Entries that are malformed, locked or duplicated are dropped with a warning.
    pub fn load(path: &Path, locked: &LockedPaths) -> Result<Self, StoreError> {
        let mut store = Self::new(Some(path.to_path_buf()));
        if !path.exists() {
            tracing::info!(path = %path.display(), "No routes file, starting with empty desired state");
            return Ok(store);
        }

        let content = fs::read_to_string(path)?;
        let loaded: Vec<Route> = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)?
        };

        let mut seen = HashSet::new();
        for route in loaded {
            if let Err(e) = validate_shape(&route.path, &route.target).and_then(|_| locked.check(&route.path)) {
                tracing::warn!(path = %route.path, error = %e, "Dropping invalid route from routes file");
                continue;
            }
            if !seen.insert(route.path.clone()) {
                tracing::warn!(path = %route.path, "Dropping duplicate route from routes file");
                continue;
            }
            store.routes.push(route);
        }

        tracing::info!(count = store.routes.len(), path = %path.display(), "Loaded routes");
        Ok(store)
    }

    /// Rewrite the whole file atomically (temp file + rename).
    pub fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &self.routes)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(count = self.routes.len(), path = %path.display(), "Persisted routes");
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Route> {
        self.routes.get_mut(index)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.routes.iter().any(|r| r.path == path)
    }

    /// Append a route and return its index.
    pub fn push(&mut self, route: Route) -> usize {
        self.routes.push(route);
        self.routes.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<Route> {
        if index < self.routes.len() {
            Some(self.routes.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn persistence_path(&self) -> Option<&Path> {
        self.persistence_path.as_deref()
    }
}
