//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! service.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (--bind, --db)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
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
pub use schema::{LimitsConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, StorageConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
