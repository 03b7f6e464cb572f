//! HTTP transport seam between the publisher and the network.
//!
//! The pool stores [`TransportHandle`]s created by a [`Connector`]. The production connector is
//! [`HyperConnector`]; tests plug in scripted implementations.
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use hyper::{Method, StatusCode, Uri, body::Bytes};

use crate::error::PublishError;

mod http;
pub use http::HyperConnector;

/// One push to the gateway.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub method: Method,
    pub url: Uri,
    pub content_type: &'static str,
    pub body: Bytes,
}

/// Gateway answer with a fully drained body.
#[derive(Debug, Clone)]
pub struct PushResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// A reusable HTTP client bound to one request timeout.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send the request and drain the response body.
    ///
    /// Any status is a successful exchange at this level; only network failures and timeouts are errors.
    async fn send(&self, request: PushRequest) -> Result<PushResponse, PublishError>;
}

/// Shared handle to a transport.
pub type TransportHandle = Arc<dyn Transport>;

/// Factory of transports, invoked by the pool when an entry is created or refreshed.
pub trait Connector: Send + Sync + 'static {
    /// Create a transport able to reach `url`, bounding every request by `timeout`.
    fn connect(&self, url: &Uri, timeout: Duration) -> Result<TransportHandle, PublishError>;
}
