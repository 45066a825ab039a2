//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (LISTEN_ADDRESS / LISTEN_PORT environment overrides)
//!     → command line flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the service runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CompilerConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
