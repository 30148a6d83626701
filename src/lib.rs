// Unleveler - rule-based unleveling patcher for Skyrim game data
//
// This is the library crate containing the engine, the record store and the
// configuration layer. The binary crate (main.rs) provides the CLI entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigManager};
pub use metrics::Metrics;
pub use models::{FormKey, Record, RuleSet, Settings};
pub use services::Patcher;
pub use store::{Changeset, MemoryStore, RecordStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
