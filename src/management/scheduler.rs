//! Periodic bookkeeping task.
//!
//! Created during setup (step after the worker pool exists) and run from
//! start() until shutdown. Publishes pool and connection occupancy through the
//! `metrics` facade at a fixed interval.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::net::{ConnectionTracker, WorkerPool};

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Periodic reporter of worker and connection occupancy.
pub struct StatsScheduler {
    interval: Duration,
    pool: WorkerPool,
    connections: ConnectionTracker,
}

impl StatsScheduler {
    pub fn new(pool: WorkerPool, connections: ConnectionTracker) -> Self {
        Self {
            interval: REPORT_INTERVAL,
            pool,
            connections,
        }
    }

    /// Run until the shutdown signal arrives.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = tick.tick() => {
                    metrics::gauge!("webapp_host_active_workers").set(self.pool.active() as f64);
                    metrics::gauge!("webapp_host_active_connections")
                        .set(self.connections.active_count() as f64);
                }
            }
        }

        tracing::debug!("stats scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scheduler_exits_on_shutdown() {
        let scheduler = StatsScheduler::new(WorkerPool::new(2), ConnectionTracker::new());
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(scheduler.run(rx));
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop")
            .expect("scheduler task failed");
    }
}
