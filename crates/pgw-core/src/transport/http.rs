use std::{
    fmt,
    sync::{Arc, OnceLock},
    time::Duration,
};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, Uri, body::Bytes, body::Incoming, header::CONTENT_TYPE};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::trace;

use crate::{
    error::PublishError,
    transport::{Connector, PushRequest, PushResponse, Transport, TransportHandle},
};

/// Keep-alive idle timeout of sockets inside one client.
const DEFAULT_SOCKET_IDLE: Duration = Duration::from_secs(90);

type TlsConnector = HttpsConnector<HttpConnector>;

/// [`Connector`] producing hyper clients.
///
/// Plain `http` URLs get a bare TCP client; `https` URLs get a rustls client trusting the
/// platform root certificates. Roots are loaded on the first `https` connect and reused by every
/// later client (clones of the connector share them). Each client keeps its own keep-alive sockets.
#[derive(Clone)]
pub struct HyperConnector {
    socket_idle: Duration,
    tls: Arc<OnceLock<Result<TlsConnector, String>>>,
}

impl HyperConnector {
    pub fn new() -> Self {
        Self {
            socket_idle: DEFAULT_SOCKET_IDLE,
            tls: Arc::new(OnceLock::new()),
        }
    }

    /// Set how long an idle keep-alive socket stays open inside a client.
    pub fn with_socket_idle(mut self, socket_idle: Duration) -> Self {
        self.socket_idle = socket_idle;
        self
    }

    fn tls(&self) -> Result<TlsConnector, PublishError> {
        self.tls
            .get_or_init(|| {
                hyper_rustls::HttpsConnectorBuilder::new()
                    .with_native_roots()
                    .map(|b| b.https_only().enable_http1().build())
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(|e| {
                PublishError::ConnectionSelection(format!(
                    "no native root CA certificates found: {e}"
                ))
            })
    }
}

impl Default for HyperConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HyperConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperConnector")
            .field("socket_idle", &self.socket_idle)
            .field("tls_loaded", &self.tls.get().is_some())
            .finish()
    }
}

impl Connector for HyperConnector {
    fn connect(&self, url: &Uri, timeout: Duration) -> Result<TransportHandle, PublishError> {
        let mut builder = Client::builder(TokioExecutor::new());
        builder.pool_idle_timeout(self.socket_idle);

        let client = if url.scheme_str() == Some("https") {
            HttpClient::Tls(builder.build(self.tls()?))
        } else {
            HttpClient::Plain(builder.build_http())
        };

        Ok(Arc::new(HyperTransport { client, timeout }))
    }
}

enum HttpClient {
    Plain(Client<HttpConnector, Full<Bytes>>),
    Tls(Client<TlsConnector, Full<Bytes>>),
}

impl HttpClient {
    async fn request(
        &self,
        req: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, hyper_util::client::legacy::Error> {
        match self {
            HttpClient::Plain(c) => c.request(req).await,
            HttpClient::Tls(c) => c.request(req).await,
        }
    }
}

struct HyperTransport {
    client: HttpClient,
    timeout: Duration,
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: PushRequest) -> Result<PushResponse, PublishError> {
        let req = Request::builder()
            .method(request.method)
            .uri(request.url)
            .header(CONTENT_TYPE, request.content_type)
            .body(Full::new(request.body))
            .map_err(|e| PublishError::Transport(format!("failed to build push request: {e}")))?;

        let exchange = async {
            let response = self
                .client
                .request(req)
                .await
                .map_err(|e| PublishError::Transport(format!("{e:?}")))?;

            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| {
                    PublishError::Transport(format!("failed to read pushgateway response: {e}"))
                })?
                .to_bytes();

            trace!(%status, body_len = body.len(), "pushgateway response drained");
            Ok::<_, PublishError>(PushResponse { status, body })
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| PublishError::Timeout(self.timeout))?
    }
}
