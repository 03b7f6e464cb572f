use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use hyper::Uri;

use crate::transport::TransportHandle;

/// Process-wide sequence for connection identifiers.
static CONN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Pool key: the fully resolved destination URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey(String);

impl From<&Uri> for PoolKey {
    fn from(url: &Uri) -> Self {
        Self(url.to_string())
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pooled transport handed out by [`crate::ConnectionPool`].
///
/// Cloning shares the underlying transport. Two connections are the same handle
/// when [`Connection::same_as`] holds.
#[derive(Clone)]
pub struct Connection {
    id: u64,
    transport: TransportHandle,
    timeout: Duration,
}

impl Connection {
    pub(crate) fn new(transport: TransportHandle, timeout: Duration) -> Self {
        Self {
            id: CONN_SEQ.fetch_add(1, Ordering::Relaxed),
            transport,
            timeout,
        }
    }

    /// Per-process identifier used in logs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Request timeout the transport was built with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Underlying transport.
    pub fn transport(&self) -> &TransportHandle {
        &self.transport
    }

    /// Returns `true` if both connections share the same transport.
    pub fn same_as(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.transport, &other.transport)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("timeout", &self.timeout)
            .field("transport", &"<handle>")
            .finish()
    }
}
