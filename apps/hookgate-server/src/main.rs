//! Hookgate Server - webhook endpoint guarded by request signature verification.
//!
//! Incoming webhooks on `WEBHOOK_PATH` must carry a valid
//! `Base64(HMAC-SHA1(AUTH_TOKEN, url + sorted form pairs))` signature header.
//! Valid requests are acknowledged; invalid ones get `403 Forbidden`.
//!
//! # Usage
//!
//! ```text
//! AUTH_TOKEN=... PUBLIC_URL=https://hooks.example.com hookgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `AUTH_TOKEN` | *(required)* | Shared secret used to verify signatures |
//! | `SIGNATURE_HEADER` | `X-Twilio-Signature` | Header carrying the signature |
//! | `WEBHOOK_PATH` | `/webhook` | Path guarded by signature verification |
//! | `PUBLIC_URL` | *(unset)* | Public scheme+host the sender signs against |
//! | `DEFAULT_SCHEME` | `https` | Scheme used with the `Host` header when `PUBLIC_URL` is unset |
//! | `MAX_BODY_BYTES` | `1048576` | Request body size limit |
//! | `REPORT_ONLY` | `false` | Log failed validations but accept anyway |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod router;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use hookgate_core::HookgateConfig;
use hookgate_http::{GateConfig, GateService, WebhookHandler};

use crate::router::Router;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`GateConfig`] from the application [`HookgateConfig`].
fn build_gate_config(config: &HookgateConfig) -> Result<GateConfig> {
    let token = config.require_auth_token()?;
    let signature_header = http::HeaderName::from_bytes(config.signature_header.as_bytes())
        .with_context(|| format!("invalid SIGNATURE_HEADER: {}", config.signature_header))?;

    let mut gate_config = GateConfig::new(token);
    gate_config.signature_header = signature_header;
    gate_config.public_url.clone_from(&config.public_url);
    gate_config.default_scheme.clone_from(&config.default_scheme);
    gate_config.max_body_bytes = config.max_body_bytes;

    Ok(gate_config)
}

/// Time allowed for the `--health-check` probe to get an answer.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Resolve once the process is asked to stop (Ctrl-C, or SIGTERM on Unix).
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}

/// Accept webhook connections until [`shutdown_signal`] fires, then drain.
async fn serve<H: WebhookHandler>(listener: TcpListener, router: Router<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let builder = HttpConnBuilder::new(TokioExecutor::new());
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept webhook connection");
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let conn = builder
            .serve_connection(TokioIo::new(stream), router.clone())
            .into_owned();
        let conn = graceful.watch(conn);
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(%peer_addr, error = %e, "webhook connection closed with error");
            }
        });
    }

    info!("draining in-flight webhook requests");
    graceful.shutdown().await;
    info!("shutdown complete");

    Ok(())
}

/// Probe `GET /health` on a running server and require a `200` status line.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let probe = async {
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .with_context(|| format!("cannot connect to {addr}"))?;
        stream
            .write_all(
                format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n")
                    .as_bytes(),
            )
            .await?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;
        anyhow::Ok(response)
    };

    let response = tokio::time::timeout(HEALTH_CHECK_TIMEOUT, probe)
        .await
        .with_context(|| format!("no health response from {addr} within {HEALTH_CHECK_TIMEOUT:?}"))??;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Whether a raw HTTP response has a `200` status line.
fn is_healthy_response(response: &[u8]) -> bool {
    let status_line = response.split(|&b| b == b'\n').next().unwrap_or_default();
    let mut fields = status_line.split(|&b| b == b' ');
    let version = fields.next().unwrap_or_default();
    version.starts_with(b"HTTP/") && fields.next() == Some(&b"200"[..])
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = HookgateConfig::from_env().context("invalid configuration")?;

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    let gate_config = build_gate_config(&config)?;
    let mut gate = GateService::new(Arc::new(webhook::acknowledge), gate_config);
    if config.report_only {
        warn!("REPORT_ONLY is enabled: requests failing signature validation will be accepted");
        gate = gate.with_on_reject(webhook::report_only());
    }

    let router = Router::new(gate, config.webhook_path.as_str());

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        webhook_path = %config.webhook_path,
        signature_header = %config.signature_header,
        public_url = ?config.public_url,
        report_only = config.report_only,
        version = env!("CARGO_PKG_VERSION"),
        "starting Hookgate Server",
    );

    serve(listener, router).await
}
