//! Reverse proxy route synchronization library.

pub mod admin;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod remote;
pub mod routes;

pub use config::SyncConfig;
pub use lifecycle::Shutdown;
pub use reconcile::{Reconciler, ReconcilerHandle};
pub use routes::{Route, RouteStatus};
