//! Configuration schema definitions.
//!
//! All values here are fixed for the process lifetime once the bootstrap is
//! constructed. Types derive Serde traits so the binary can load them from a
//! TOML file; embedders usually build a [`ServerConfig`] directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the server host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Port for the plaintext HTTP listener. Must be non-zero.
    pub listen_port: u16,

    /// Directory containing the packaged application artifact. Must be non-empty.
    pub webapp_dir: PathBuf,

    /// Directory for static resources. Accepted but currently unused; reserved
    /// for a static-file handler that is not wired into the handler chain.
    #[serde(default)]
    pub files_dir: Option<PathBuf>,

    /// Worker pool bounds.
    #[serde(default)]
    pub workers: WorkerPoolConfig,

    /// Listener settings (idle timeout).
    #[serde(default)]
    pub listener: ListenerSettings,

    /// Plaintext HTTP protocol configuration.
    #[serde(default)]
    pub protocol: HttpProtocolConfig,
}

impl ServerConfig {
    /// Build a configuration from the three construction parameters, with all
    /// other values at their fixed defaults.
    pub fn new(listen_port: u16, webapp_dir: impl Into<PathBuf>, files_dir: Option<PathBuf>) -> Self {
        Self {
            listen_port,
            webapp_dir: webapp_dir.into(),
            files_dir,
            workers: WorkerPoolConfig::default(),
            listener: ListenerSettings::default(),
            protocol: HttpProtocolConfig::default(),
        }
    }
}

/// Bounds for the request-handling worker pool.
///
/// The cap is a conservative fixed upper bound; it exists to bound resource
/// usage under load, not to scale with it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Maximum concurrent workers (connections being served).
    pub max_workers: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self { max_workers: 500 }
    }
}

/// Settings applied to the plaintext listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerSettings {
    /// Per-connection idle timeout in milliseconds.
    pub idle_timeout_ms: u64,
}

impl ListenerSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self { idle_timeout_ms: 30_000 }
    }
}

/// Plaintext HTTP protocol configuration.
///
/// The secure scheme and port are metadata only: they describe where an
/// encrypted listener would live, they do not open one.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpProtocolConfig {
    /// Scheme label for the (unimplemented) secure listener.
    pub secure_scheme: String,

    /// Paired secure port. Metadata only.
    pub secure_port: u16,

    /// Response output buffer size in bytes.
    pub output_buffer_size: usize,

    /// Request header size cap in bytes.
    pub request_header_size: usize,

    /// Response header size cap in bytes.
    pub response_header_size: usize,

    /// Whether responses carry a `Server` header identifying this host.
    pub send_server_version: bool,

    /// Whether responses carry an automatic `Date` header.
    pub send_date_header: bool,
}

impl Default for HttpProtocolConfig {
    fn default() -> Self {
        Self {
            secure_scheme: "https".to_string(),
            secure_port: 8443,
            output_buffer_size: 32_768,
            request_header_size: 8_192,
            response_header_size: 8_192,
            send_server_version: true,
            send_date_header: false,
        }
    }
}
