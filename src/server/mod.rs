//! Server assembly subsystem.
//!
//! # Data Flow
//! ```text
//! ServerBootstrap::new (validated construction)
//!     → setup(): pool → scheduler → handler chain → flags → management
//!                → application deploy → secure slot → protocol → bind
//!     → ConfiguredServer (listener bound, not accepting)
//!     → start(): accept loop + scheduler + signal hook spawned
//!     → RunningServer
//!     → stop(): shutdown broadcast → port released → connections drained
//! ```

pub mod bootstrap;
pub mod handlers;

pub use bootstrap::{
    ConfiguredServer, PreFilter, RunningServer, SecureListenerFactory, ServerBootstrap,
    ShutdownError, StartupError,
};
pub use handlers::HandlerChain;
