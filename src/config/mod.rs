//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SyncConfig (validated, immutable)
//!     → handed by value to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::SyncConfig;
pub use schema::{
    AdminConfig, EngineConfig, HealthCheckConfig, LockedConfig, ObservabilityConfig, RemoteConfig,
    StoreConfig,
};
