//! Per-connection HTTP/1.1 serving and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Count active connections so stop() can drain them
//! - Drive one hyper HTTP/1.1 connection per accepted socket

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use crate::config::HttpProtocolConfig;
use crate::net::pool::WorkerPermit;

/// Global atomic counter for connection IDs. Relaxed ordering is enough; only
/// uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Counts active connections so shutdown can wait for them to finish.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    active: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new active connection. The guard decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            active: Arc::clone(&self.active),
            id: ConnectionId::new(),
        }
    }

    /// Current active connection count.
    pub fn active_count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait until every connection has closed, up to `timeout`.
    ///
    /// Returns `false` if connections were still open at the deadline.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.active.load(Ordering::SeqCst) > 0 {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        true
    }
}

/// Guard tracking one connection's lifetime.
#[derive(Debug)]
pub struct ConnectionGuard {
    active: Arc<AtomicU64>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(connection_id = %self.id, "connection closed");
    }
}

/// hyper exposes one buffer knob for the connection, so it is sized to the
/// largest of the output buffer and both header caps; the header caps thereby
/// bound the request head hyper will accept.
pub(crate) fn connection_buffer_size(protocol: &HttpProtocolConfig) -> usize {
    protocol
        .output_buffer_size
        .max(protocol.request_header_size)
        .max(protocol.response_header_size)
}

/// Build the hyper HTTP/1.1 connection builder from the protocol configuration.
pub(crate) fn http1_builder(protocol: &HttpProtocolConfig, idle_timeout: Duration) -> http1::Builder {
    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .keep_alive(true)
        .header_read_timeout(idle_timeout)
        .max_buf_size(connection_buffer_size(protocol))
        .auto_date_header(protocol.send_date_header);
    builder
}

/// Serve one accepted socket until it closes or shutdown is signalled.
///
/// On shutdown the connection is asked to finish its in-flight exchange and
/// close; the worker permit and tracker guard are released when it does.
pub(crate) async fn serve_http1(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    builder: Arc<http1::Builder>,
    mut shutdown: broadcast::Receiver<()>,
    guard: ConnectionGuard,
    permit: WorkerPermit,
) {
    let id = guard.id();
    let io = TokioIo::new(stream);
    let service = TowerToHyperService::new(router);
    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    let mut draining = false;
    loop {
        if draining {
            if let Err(err) = conn.as_mut().await {
                tracing::debug!(connection_id = %id, peer_addr = %peer, error = %err, "connection ended during drain");
            }
            break;
        }
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(err) = result {
                    tracing::debug!(connection_id = %id, peer_addr = %peer, error = %err, "connection ended with error");
                }
                break;
            }
            _ = shutdown.recv() => {
                conn.as_mut().graceful_shutdown();
                draining = true;
            }
        }
    }

    drop(permit);
    drop(guard);
}
