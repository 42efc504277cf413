//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! On demand (listRoutes, apply, reload):
//!     Reconciler
//!     → probe.rs GET <proxy_url><route path> through the public listener
//!     → bool (status < 500)
//!
//! Periodic (monitor.rs, optional):
//!     Timer tick
//!     → ReconcilerHandle::refresh_health
//!     → statuses re-derived and persisted by the worker
//! ```
//!
//! # Design Decisions
//! - Probes exercise effective routing, not config acceptance
//! - 4xx is healthy: the route reached something that answered
//! - Probe failures never surface as engine errors

pub mod monitor;
pub mod probe;

pub use monitor::HealthMonitor;
pub use probe::HealthChecker;
