//! Remote proxy configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciler
//!     → client.rs  GET  <config_url>/config/                       (full tree)
//!     → client.rs  server name (configured, or the single server present)
//!     → descriptor.rs Route → native route descriptor
//!     → client.rs  PUT  <config_url>/config/apps/http/servers/<server>/routes
//! ```
//!
//! # Design Decisions
//! - Whole-list replacement is the only mutation; no index-addressed edits
//! - descriptor.rs is the only code that knows the descriptor schema
//! - Every call carries a timeout; retries belong to the caller
//! - Remote route entries are kept as opaque JSON so locked entries pass through untouched

pub mod client;
pub mod descriptor;
pub mod types;

pub use client::ConfigClient;
pub use types::{RemoteError, RemoteResult};
