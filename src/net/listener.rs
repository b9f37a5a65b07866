//! Plaintext TCP listener bound to the configured port.
//!
//! # Responsibilities
//! - Bind exactly one inbound listener during setup
//! - Accept incoming connections, gated by the worker pool
//! - Release the port when dropped (stop)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::net::pool::{WorkerPermit, WorkerPool};

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to the configured port.
    #[error("failed to bind: {0}")]
    Bind(std::io::Error),

    /// Failed to accept a connection.
    #[error("failed to accept: {0}")]
    Accept(std::io::Error),
}

/// The single plaintext listener registered with the server instance.
///
/// Accepting is gated by the worker pool: when all workers are busy, new
/// connections wait in the OS backlog until a slot frees up.
pub struct Listener {
    inner: TcpListener,
    pool: WorkerPool,
}

impl Listener {
    /// Bind to the configured port on all interfaces.
    pub async fn bind(port: u16, pool: WorkerPool) -> Result<Self, ListenerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let inner = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = inner.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            max_workers = pool.max_workers(),
            "listener bound"
        );

        Ok(Self { inner, pool })
    }

    /// Accept a new connection, holding a worker permit for its lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, WorkerPermit), ListenerError> {
        // Acquire the worker slot before accepting so the cap applies.
        let permit = self.pool.acquire().await;

        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(
            peer_addr = %addr,
            available_workers = self.pool.available(),
            "connection accepted"
        );

        Ok((stream, addr, permit))
    }

    /// Local address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// The worker pool gating this listener.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}
