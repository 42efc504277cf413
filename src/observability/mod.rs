//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, one span per engine operation)
//!     → metrics.rs (operation counters and latency, per-route health)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted messages
//! - Operation ID flows through every log line of an engine operation
//! - Metrics are cheap; recording without an installed exporter is a no-op

pub mod logging;
pub mod metrics;
