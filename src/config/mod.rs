//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → HstsConfig::to_policy() shared read-only by every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_from_str, ConfigError};
pub use schema::GuardConfig;
pub use schema::{
    EnvironmentConfig, HstsConfig, ListenerConfig, LogFormat, ObservabilityConfig, TimeoutConfig,
    TlsConfig,
};
pub use validation::{validate_config, ValidationError};
