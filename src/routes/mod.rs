//! Desired-state subsystem.
//!
//! # Data Flow
//! ```text
//! routes.json (startup)
//!     → store.rs (load, drop invalid entries)
//!     → RouteStore (owned by the reconcile worker)
//!
//! add/remove/status update
//!     → model.rs (validate path/target)
//!     → locked.rs (reject reserved prefixes)
//!     → store.rs (mutate, rewrite file atomically)
//! ```
//!
//! # Design Decisions
//! - Path is the business key; duplicates never reach the store
//! - Store order is insertion order; the remote sees it reversed
//! - The whole file is the unit of durability

pub mod locked;
pub mod model;
pub mod store;

pub use locked::LockedPaths;
pub use model::{Route, RouteStatus, ValidationError};
pub use store::{RouteStore, StoreError};
