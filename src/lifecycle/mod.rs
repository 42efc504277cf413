//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load routes file → Build client/prober → Spawn reconcile worker
//!     → Replay desired state (reload) → Spawn health monitor
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Admin server drains → Worker finishes current op → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - A cold or unreachable remote at startup is logged, not fatal
//! - The worker is never interrupted mid-operation

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
