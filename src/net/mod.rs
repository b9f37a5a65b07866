//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept, gated by pool.rs worker permits)
//!     → connection.rs (HTTP/1.1 serving, lifecycle tracking)
//!     → handler chain (server::handlers)
//! ```
//!
//! # Design Decisions
//! - One plaintext listener per server instance; the port is released on drop
//! - The worker pool caps concurrent connections process-wide
//! - Each connection is tracked so stop() can drain before returning

pub mod connection;
pub mod listener;
pub mod pool;

pub use connection::{ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
pub use pool::WorkerPool;
