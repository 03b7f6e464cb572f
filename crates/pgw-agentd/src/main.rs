use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use pgw_core::{ConnectionPool, HyperConnector, MetricsHandle, PoolConfig, Publisher};
use pgw_model::{CONTENT_TYPE_JSON, PublishConfig};
use pgw_observe::{LoggerConfig, LoggerFormat, init_logger};
use pgw_prometheus::PrometheusMetrics;

/// Push metric batches to a Prometheus Pushgateway.
#[derive(Debug, Parser)]
#[command(name = "pgw-agentd", version)]
struct Args {
    /// JSON object with publisher options (host, port, job, retries, ...).
    #[arg(long, short)]
    config: PathBuf,

    /// Encoded metric batch; `-` reads standard input.
    #[arg(long, short, default_value = "-")]
    metrics: PathBuf,

    /// Content type of the batch.
    #[arg(long, default_value = CONTENT_TYPE_JSON)]
    content_type: String,

    /// Log output: text, json or journald.
    #[arg(long, default_value = "text")]
    log_format: LoggerFormat,

    /// Re-read and publish the batch every N seconds until interrupted.
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Idle seconds before a pooled pushgateway connection is dropped.
    #[arg(long, default_value_t = 300)]
    max_idle_secs: u64,

    /// Print the publisher's own metrics on exit.
    #[arg(long)]
    self_metrics: bool,
}

/// Where each publish takes its encoded batch from.
///
/// Standard input is drained once and replayed on every tick; files are re-read so edits are picked up.
#[derive(Debug)]
enum BatchSource {
    Inline(Vec<u8>),
    File(PathBuf),
}

impl BatchSource {
    async fn open(path: &Path) -> anyhow::Result<Self> {
        if path != Path::new("-") {
            return Ok(Self::File(path.to_path_buf()));
        }
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("reading metric batch from stdin")?;
        Ok(Self::Inline(buf))
    }

    async fn load(&self) -> anyhow::Result<Cow<'_, [u8]>> {
        match self {
            Self::Inline(buf) => Ok(Cow::Borrowed(buf)),
            Self::File(path) => tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .with_context(|| format!("reading metric batch from {}", path.display())),
        }
    }
}

async fn load_config(path: &Path) -> anyhow::Result<PublishConfig> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: PublishConfig = serde_json::from_slice(&raw)
        .with_context(|| format!("invalid publisher config {}", path.display()))?;
    Ok(cfg)
}

async fn run(args: &Args, publisher: &Publisher, config: &PublishConfig) -> anyhow::Result<()> {
    let source = BatchSource::open(&args.metrics).await?;

    let Some(secs) = args.interval_secs else {
        let batch = source.load().await?;
        publisher
            .publish_encoded(&args.content_type, &batch, config)
            .await?;
        return Ok(());
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted, stopping");
                return Ok(());
            }
            _ = ticker.tick() => {
                let published = match source.load().await {
                    Ok(batch) => publisher
                        .publish_encoded(&args.content_type, &batch, config)
                        .await
                        .map_err(anyhow::Error::from),
                    Err(e) => Err(e),
                };
                if let Err(e) = published {
                    error!(error = %e, "publish failed");
                }
            }
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1) config + logger
    let config = load_config(&args.config).await?;
    init_logger(&LoggerConfig::for_publisher(&config, args.log_format))?;
    info!(host = %config.host, port = config.port, job = %config.job, "publisher configured");

    // 2) self-metrics
    let metrics = Arc::new(PrometheusMetrics::new()?);
    let handle: MetricsHandle = metrics.clone();

    // 3) pool + reaper
    let pool_config = PoolConfig {
        max_idle: Duration::from_secs(args.max_idle_secs),
        ..PoolConfig::default()
    };
    let pool = Arc::new(
        ConnectionPool::new(Arc::new(HyperConnector::new()), pool_config)
            .with_metrics(handle.clone()),
    );
    let reaper = pool.spawn_reaper();
    let publisher = Publisher::new(pool).with_metrics(handle);

    // 4) publish once, or on every tick
    let result = run(&args, &publisher, &config).await;
    reaper.shutdown().await;

    if args.self_metrics {
        print!("{}", metrics.encode_text()?);
    }
    result
}
