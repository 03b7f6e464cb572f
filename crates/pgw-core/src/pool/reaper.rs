use std::{sync::Weak, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::ConnectionPool;

/// Handle to the background task sweeping a [`ConnectionPool`].
///
/// The task scans the pool every `scan_interval` (first scan one interval after start) and
/// exits when the handle is stopped or dropped, or when the pool is gone.
pub struct Reaper {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    pub(super) fn spawn(pool: Weak<ConnectionPool>, scan_interval: Duration) -> Self {
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + scan_interval, scan_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(scan_secs = scan_interval.as_secs(), "connection reaper started");

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(pool) = pool.upgrade() else { break };
                        let evicted = pool.sweep();
                        trace!(evicted, remaining = pool.len(), "connection reaper scan done");
                    }
                }
            }
            debug!("connection reaper stopped");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Request the reaper to stop. Does not wait for it.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns `true` while the background task is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the reaper and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
