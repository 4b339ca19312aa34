//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (the fixed constants)
//!     → optional TOML file (loader.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → consumed once by HttpServer::new
//! ```
//!
//! # Design Decisions
//! - Every field has a default, so no file is required at all
//! - Config is immutable once loaded; there is no reload path
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, ProxyConfig, TimeoutConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
