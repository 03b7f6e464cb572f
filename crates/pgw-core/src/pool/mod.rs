//! Keyed pool of reusable transports with idle eviction.
//!
//! - One entry per destination URL ([`PoolKey`]).
//! - A single lock guards the whole map; it is held only for lookup, create and sweep, never across a request.
//! - Entries idle for longer than [`PoolConfig::max_idle`] are dropped by [`ConnectionPool::sweep`],
//!   which the [`Reaper`] runs every [`PoolConfig::scan_interval`].
mod connection;
pub use connection::{Connection, PoolKey};

mod reaper;
pub use reaper::Reaper;

use std::{collections::HashMap, sync::Arc, time::Duration};

use hyper::Uri;
use parking_lot::Mutex;
use pgw_model::PublishConfig;
use tokio::time::Instant;
use tracing::debug;

use crate::{
    error::PublishError,
    metrics::{MetricsHandle, noop_metrics},
    transport::Connector,
    url::build_push_url,
};

/// Maximum time an entry may sit unused before the reaper drops it.
pub const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(5 * 60);

/// Period of reaper scans.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Pool eviction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Idle time after which an entry is evicted.
    pub max_idle: Duration,
    /// Period of reaper scans.
    pub scan_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
            scan_interval: DEFAULT_SCAN_INTERVAL,
        }
    }
}

struct PoolEntry {
    key: PoolKey,
    connection: Connection,
    last_used: Instant,
}

/// Pool of pushgateway connections keyed by destination URL.
pub struct ConnectionPool {
    entries: Mutex<HashMap<PoolKey, PoolEntry>>,
    connector: Arc<dyn Connector>,
    config: PoolConfig,
    metrics: MetricsHandle,
}

impl ConnectionPool {
    /// Create an empty pool. No reaper runs until [`ConnectionPool::spawn_reaper`] is called.
    pub fn new(connector: Arc<dyn Connector>, config: PoolConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            connector,
            config,
            metrics: noop_metrics(),
        }
    }

    /// Replace the metrics backend and return updated pool.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Select a connection for the destination described by `config`.
    ///
    /// Reuses the pooled connection and refreshes its last-used time, unless `force_refresh`
    /// is set or no entry exists: then a new connection with `config.timeout_secs` replaces it.
    pub fn select(
        &self,
        config: &PublishConfig,
        force_refresh: bool,
    ) -> Result<Connection, PublishError> {
        let url = build_push_url(config)?;
        self.select_url(&url, config.timeout(), force_refresh)
    }

    /// Same as [`ConnectionPool::select`] for an already resolved URL.
    pub fn select_url(
        &self,
        url: &Uri,
        timeout: Duration,
        force_refresh: bool,
    ) -> Result<Connection, PublishError> {
        let key = PoolKey::from(url);
        let mut entries = self.entries.lock();
        let now = Instant::now();

        if !force_refresh {
            if let Some(entry) = entries.get_mut(&key) {
                entry.last_used = now;
                debug!(url = %key, conn = entry.connection.id(), "using open pushgateway connection");
                return Ok(entry.connection.clone());
            }
        }

        let transport = self.connector.connect(url, timeout)?;
        let connection = Connection::new(transport, timeout);
        debug!(url = %key, conn = connection.id(), force_refresh, "opening new pushgateway connection");

        entries.insert(
            key.clone(),
            PoolEntry {
                key,
                connection: connection.clone(),
                last_used: now,
            },
        );
        Ok(connection)
    }

    /// Drop every entry idle for longer than `max_idle`. Returns the number of evicted entries.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let max_idle = self.config.max_idle;

        let evicted = {
            let mut entries = self.entries.lock();
            let before = entries.len();
            entries.retain(|_, entry| {
                let idle = now.saturating_duration_since(entry.last_used);
                let keep = idle <= max_idle;
                if !keep {
                    debug!(url = %entry.key, conn = entry.connection.id(), idle_secs = idle.as_secs(), "evicting idle pushgateway connection");
                }
                keep
            });
            before - entries.len()
        };

        if evicted > 0 {
            self.metrics.record_pool_evictions(evicted);
        }
        evicted
    }

    /// Start the background reaper for this pool.
    ///
    /// The reaper stops when the returned handle is stopped or dropped, or when the pool itself is dropped.
    pub fn spawn_reaper(self: &Arc<Self>) -> Reaper {
        Reaper::spawn(Arc::downgrade(self), self.config.scan_interval)
    }

    /// Number of pooled entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if the pool holds no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &PoolKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Last-used time of the entry for `key`.
    pub fn last_used(&self, key: &PoolKey) -> Option<Instant> {
        self.entries.lock().get(key).map(|e| e.last_used)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingConnector;
    use super::*;

    fn pool() -> (Arc<CountingConnector>, ConnectionPool) {
        let connector = Arc::new(CountingConnector::default());
        let pool = ConnectionPool::new(connector.clone(), PoolConfig::default());
        (connector, pool)
    }

    fn cfg(job: &str) -> PublishConfig {
        let mut c = PublishConfig::new("gw", 9091);
        c.job = job.to_string();
        c
    }

    fn key(job: &str) -> PoolKey {
        PoolKey::from(&build_push_url(&cfg(job)).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn reuse_returns_same_handle_and_refreshes_last_used() {
        let (connector, pool) = pool();

        let first = pool.select(&cfg("a"), false).unwrap();
        let created = pool.last_used(&key("a")).unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        let second = pool.select(&cfg("a"), false).unwrap();

        assert!(first.same_as(&second));
        assert_eq!(connector.count(), 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(
            pool.last_used(&key("a")).unwrap() - created,
            Duration::from_secs(30)
        );
    }

    #[tokio::test]
    async fn force_refresh_replaces_handle() {
        let (connector, pool) = pool();

        let first = pool.select(&cfg("a"), false).unwrap();
        let refreshed = pool.select(&cfg("a"), true).unwrap();

        assert!(!first.same_as(&refreshed));
        assert_eq!(connector.count(), 2);
        assert_eq!(pool.len(), 1);

        let reused = pool.select(&cfg("a"), false).unwrap();
        assert!(reused.same_as(&refreshed));
    }

    #[tokio::test]
    async fn entries_are_keyed_by_destination() {
        let (connector, pool) = pool();

        let a = pool.select(&cfg("a"), false).unwrap();
        let b = pool.select(&cfg("b"), false).unwrap();

        assert!(!a.same_as(&b));
        assert_eq!(connector.count(), 2);
        assert!(pool.contains(&key("a")));
        assert!(pool.contains(&key("b")));
    }

    #[tokio::test]
    async fn new_connection_carries_configured_timeout() {
        let (_, pool) = pool();
        let mut c = cfg("a");
        c.timeout_secs = 3;

        let conn = pool.select(&c, false).unwrap();
        assert_eq!(conn.timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn invalid_destination_is_not_pooled() {
        let (connector, pool) = pool();

        let err = pool.select(&cfg("bad job"), false).unwrap_err();
        assert!(matches!(err, PublishError::InvalidConfiguration(_)));
        assert!(pool.is_empty());
        assert_eq!(connector.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_idle_entries() {
        let (_, pool) = pool();

        pool.select(&cfg("stale"), false).unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        pool.select(&cfg("fresh"), false).unwrap();
        tokio::time::advance(Duration::from_secs(2 * 60)).await;

        assert_eq!(pool.sweep(), 1);
        assert!(!pool.contains(&key("stale")));
        assert!(pool.contains(&key("fresh")));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_idle_exactly_max_idle_survives() {
        let (_, pool) = pool();

        pool.select(&cfg("a"), false).unwrap();
        tokio::time::advance(DEFAULT_MAX_IDLE).await;

        assert_eq!(pool.sweep(), 0);
        assert_eq!(pool.len(), 1);
    }
}
