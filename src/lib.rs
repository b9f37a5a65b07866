//! Embeddable HTTP server bootstrap.
//!
//! Assembles a server instance that hosts one packaged web application at a
//! fixed context path, alongside a small administrative context and a default
//! not-found handler, then exposes a one-shot lifecycle:
//!
//! ```text
//! ServerBootstrap::new(port, webapp_dir, files_dir)?   // unconfigured
//!     .setup(app).await?                               // configured, bound
//!     .start().await?                                  // started, accepting
//!     .stop().await?                                   // stopped (terminal)
//! ```
//!
//! The application itself is an opaque collaborator ([`deploy::Application`]);
//! this crate only builds the infrastructure around it: a bounded worker
//! pool, a periodic bookkeeping scheduler, the handler chain, a management
//! hook and a single plaintext listener.

pub mod admin;
pub mod config;
pub mod deploy;
pub mod lifecycle;
pub mod management;
pub mod net;
pub mod observability;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use deploy::{Application, WebAppContext};
pub use lifecycle::Shutdown;
pub use server::{ConfiguredServer, RunningServer, ServerBootstrap, ShutdownError, StartupError};
