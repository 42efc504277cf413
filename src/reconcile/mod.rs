//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! ReconcilerHandle (any task)
//!     → worker.rs (bounded queue, one consumer)
//!     → reconciler.rs apply | remove | reload | refresh_health
//!         → ConfigClient: fetch full config, resolve server
//!         → plan.rs: partition remote list into locked / business
//!         → plan.rs: compose desired business (newest first) ++ locked (original order)
//!         → ConfigClient: replace route list
//!         → HealthChecker: probe
//!         → status.rs: derive status
//!         → RouteStore: persist
//! ```
//!
//! # Design Decisions
//! - One in-flight operation at a time; the worker owns store and client
//! - RouteStore is authoritative for business routes; remote business entries
//!   are regenerated on every write, locked entries pass through untouched
//! - Remote failures are recorded on the route and returned, never retried

pub mod error;
pub mod plan;
pub mod reconciler;
pub mod status;
pub mod worker;

pub use error::{ReconcileError, ReconcileResult};
pub use reconciler::{FailedRoute, ReloadReport, Reconciler};
pub use worker::{spawn, ReconcilerHandle};
