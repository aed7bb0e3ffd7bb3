//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (LB_* / rate limit environment overrides)
//!     → loader.rs (command line flags, resolve_config)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reconfiguration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, CommandLine, ConfigError};
pub use schema::{
    BackendConfig, BalancerConfig, ForwardingConfig, ListenerConfig, ObservabilityConfig,
    RateLimitConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
