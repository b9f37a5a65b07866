//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or construction parameters
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, fail-fast)
//!     → ServerConfig (validated, immutable)
//!     → consumed by the bootstrap sequence
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the bootstrap is constructed; there is no reload
//! - All ancillary fields have defaults so the three construction parameters
//!   (port, webapp dir, files dir) are enough
//! - Validation separates syntactic (serde) from semantic checks and runs at
//!   construction time, never at start

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{HttpProtocolConfig, ListenerSettings, ServerConfig, WorkerPoolConfig};
pub use validation::ValidationError;
