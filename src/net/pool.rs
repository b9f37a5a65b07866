//! Bounded worker pool for request-handling concurrency.
//!
//! The pool is created first in the bootstrap sequence and handed to the
//! listener; every accepted connection holds one permit for its lifetime, so
//! the cap bounds concurrent request handling process-wide.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Semaphore-backed concurrency cap, exclusively owned by the server instance.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    max_workers: usize,
}

impl WorkerPool {
    /// Create a pool with the given fixed cap.
    pub fn new(max_workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            max_workers,
        }
    }

    /// Acquire a worker slot, waiting if the cap has been reached.
    pub async fn acquire(&self) -> WorkerPermit {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("worker pool semaphore closed");
        WorkerPermit { _permit: permit }
    }

    /// Configured maximum number of workers.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Currently available worker slots.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Workers currently in use.
    pub fn active(&self) -> usize {
        self.max_workers - self.permits.available_permits()
    }
}

/// A held worker slot. Dropping it returns the slot to the pool, even if the
/// connection task panics.
#[derive(Debug)]
pub struct WorkerPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn pool_enforces_cap() {
        let pool = WorkerPool::new(2);
        assert_eq!(pool.max_workers(), 2);

        let p1 = pool.acquire().await;
        let p2 = pool.acquire().await;
        assert_eq!(pool.active(), 2);
        assert_eq!(pool.available(), 0);

        // Third acquire must block until a permit is released.
        let blocked = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(blocked.is_err());

        drop(p1);
        let p3 = pool.acquire().await;
        assert_eq!(pool.active(), 2);

        drop(p2);
        drop(p3);
        assert_eq!(pool.active(), 0);
    }
}
