//! Observability subsystem.
//!
//! Structured logging via `tracing` throughout the crate; subscriber
//! initialization lives here and is called by the binary only, so embedders
//! keep control of their own subscriber. Metrics flow through the `metrics`
//! facade from the management hooks.

pub mod logging;
