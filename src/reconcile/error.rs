//! Engine error definitions.

use thiserror::Error;

use crate::remote::RemoteError;
use crate::routes::{StoreError, ValidationError};

/// Errors returned by reconciliation operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Input rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Config API call failed; the affected route records the reason.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Index out of range on remove.
    #[error("no route at index {0}")]
    NotFound(usize),

    /// Desired state could not be written to disk.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The reconcile worker is no longer running.
    #[error("reconcile worker stopped")]
    WorkerStopped,
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
