use std::{
    collections::VecDeque,
    convert::Infallible,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use http_body_util::{BodyExt, Full};
use hyper::{
    Method, Request, Response, body::Bytes, body::Incoming, header::CONTENT_TYPE,
    server::conn::http1, service::service_fn,
};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use pgw_core::{
    ConnectionPool, EXPOSITION_CONTENT_TYPE, HyperConnector, PoolConfig, PublishError, Publisher,
};
use pgw_model::{BackoffStrategy, JitterStrategy, MetricRecord, NamespaceElement, PublishConfig};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Captured {
    method: Method,
    path: String,
    content_type: Option<String>,
    body: String,
}

#[derive(Default)]
struct GatewayState {
    requests: Mutex<Vec<Captured>>,
    statuses: Mutex<VecDeque<u16>>,
    stall: Option<Duration>,
}

struct Gateway {
    addr: SocketAddr,
    state: Arc<GatewayState>,
}

impl Gateway {
    async fn start(statuses: impl IntoIterator<Item = u16>) -> Self {
        Self::serve(GatewayState {
            statuses: Mutex::new(statuses.into_iter().collect()),
            ..Default::default()
        })
        .await
    }

    /// Gateway that answers every request only after `stall`.
    async fn stalling(stall: Duration) -> Self {
        Self::serve(GatewayState {
            stall: Some(stall),
            ..Default::default()
        })
        .await
    }

    async fn serve(state: GatewayState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(state);

        let shared = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = shared.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, state.clone()));
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, state }
    }

    fn requests(&self) -> Vec<Captured> {
        self.state.requests.lock().clone()
    }
}

async fn handle(
    req: Request<Incoming>,
    state: Arc<GatewayState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = req
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes())
        .unwrap_or_default();

    state.requests.lock().push(Captured {
        method,
        path,
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if let Some(stall) = state.stall {
        tokio::time::sleep(stall).await;
    }

    let status = state.statuses.lock().pop_front().unwrap_or(200);
    Ok(Response::builder()
        .status(status)
        .body(Full::new(Bytes::from_static(b"gateway says hi")))
        .unwrap())
}

fn publisher() -> Publisher {
    let pool = ConnectionPool::new(Arc::new(HyperConnector::new()), PoolConfig::default());
    Publisher::new(Arc::new(pool))
}

fn config(addr: SocketAddr, retries: u32) -> PublishConfig {
    let mut cfg = PublishConfig::new(addr.ip().to_string(), addr.port());
    cfg.job = "batch1".into();
    cfg.instance = "i1".into();
    cfg.retries = retries;
    cfg.timeout_secs = 5;
    cfg.backoff = BackoffStrategy {
        jitter: JitterStrategy::None,
        first_ms: 1,
        max_ms: 5,
        factor: 2.0,
    };
    cfg
}

fn cpu_batch() -> Vec<MetricRecord> {
    vec![
        MetricRecord::new(
            [
                NamespaceElement::fixed("cpu"),
                NamespaceElement::dynamic("core", "0"),
                NamespaceElement::fixed("percent"),
            ],
            42_i64,
        )
        .with_unit("percent")
        .with_tag("plugin_running_on", "node-a"),
    ]
}

#[tokio::test]
async fn delivers_batch_with_put() {
    let gateway = Gateway::start([]).await;
    let cfg = config(gateway.addr, 3);

    publisher().publish(&cpu_batch(), &cfg).await.unwrap();

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, Method::PUT);
    assert_eq!(req.path, "/metrics/job/batch1/instance/i1");
    assert_eq!(req.content_type.as_deref(), Some(EXPOSITION_CONTENT_TYPE));
    assert_eq!(
        req.body,
        "cpu_percent{core=\"0\",host=\"node-a\",source=\"node-a\",unit=\"percent\"} 42\n"
    );
}

#[tokio::test]
async fn replace_uses_post() {
    let gateway = Gateway::start([]).await;
    let mut cfg = config(gateway.addr, 1);
    cfg.replace = true;

    publisher().publish(&cpu_batch(), &cfg).await.unwrap();

    assert_eq!(gateway.requests()[0].method, Method::POST);
}

#[tokio::test]
async fn unavailable_gateway_is_retried() {
    let gateway = Gateway::start([503, 200]).await;
    let cfg = config(gateway.addr, 3);

    publisher().publish(&cpu_batch(), &cfg).await.unwrap();

    assert_eq!(gateway.requests().len(), 2);
}

#[tokio::test]
async fn rejected_body_surfaces_status() {
    let gateway = Gateway::start([400]).await;
    let cfg = config(gateway.addr, 3);

    let err = publisher().publish(&cpu_batch(), &cfg).await.unwrap_err();

    match err {
        PublishError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "gateway says hi");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn closed_port_exhausts_retries() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let cfg = config(addr, 2);

    let err = publisher().publish(&cpu_batch(), &cfg).await.unwrap_err();

    assert!(matches!(err, PublishError::Exhausted { attempts: 2, .. }));
}

#[tokio::test]
async fn stalled_gateway_times_out_every_attempt() {
    let gateway = Gateway::stalling(Duration::from_secs(5)).await;
    let mut cfg = config(gateway.addr, 2);
    cfg.timeout_secs = 1;

    let started = Instant::now();
    let err = publisher().publish(&cpu_batch(), &cfg).await.unwrap_err();

    match err {
        PublishError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(last.contains("timed out"), "last error: {last}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(gateway.requests().len(), 2);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn encoded_json_batch_is_published() {
    let gateway = Gateway::start([]).await;
    let cfg = config(gateway.addr, 1);
    let payload = br#"[{
        "namespace": [{"value": "mem"}, {"value": "free"}],
        "tags": {},
        "unit": "B",
        "data": 1024,
        "timestamp": "2026-01-02T03:04:05Z"
    }]"#;

    publisher()
        .publish_encoded("snap.json", payload, &cfg)
        .await
        .unwrap();

    assert_eq!(gateway.requests()[0].body, "mem_free{unit=\"B\"} 1024\n");
}
