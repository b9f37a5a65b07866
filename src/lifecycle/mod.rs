//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! setup():  construct everything, bind the listener (no traffic yet)
//! start():  spawn accept loop + scheduler, install signal hook, accept traffic
//! stop():   trigger shutdown broadcast → drop listener → drain connections
//! ```
//!
//! # Design Decisions
//! - The state machine (unconfigured → configured → started → stopped) is
//!   encoded in types, so out-of-order calls do not compile
//! - Stopped is terminal; there is no restart path
//! - Process-wide coupling ("stop on process shutdown") is an explicit flag
//!   that installs a signal watcher, not implicit global state

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;

/// Process-lifecycle flags applied during setup.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleFlags {
    /// Log a full configuration dump after a successful start.
    pub dump_after_start: bool,

    /// Log a full configuration dump before stopping.
    pub dump_before_stop: bool,

    /// Stop the server when the process receives a shutdown signal, so the
    /// listener never outlives the process.
    pub stop_at_shutdown: bool,
}

impl Default for LifecycleFlags {
    fn default() -> Self {
        Self {
            dump_after_start: false,
            dump_before_stop: false,
            stop_at_shutdown: true,
        }
    }
}
