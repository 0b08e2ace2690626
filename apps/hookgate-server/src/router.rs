//! Top-level router for the server.
//!
//! Health-check endpoints (`/health`, `/_health`) are answered directly.
//! Requests to the configured webhook path go through the [`GateService`];
//! every other path gets `404 Not Found`.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::service::Service;

use hookgate_http::{GateBody, GateService, WebhookHandler, status_response};

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Routes requests between health probes and the gated webhook.
#[derive(Debug)]
pub struct Router<H: WebhookHandler> {
    gate: GateService<H>,
    webhook_path: Arc<str>,
}

impl<H: WebhookHandler> Router<H> {
    /// Create a router that guards `webhook_path` with `gate`.
    pub fn new(gate: GateService<H>, webhook_path: impl Into<Arc<str>>) -> Self {
        Self {
            gate,
            webhook_path: webhook_path.into(),
        }
    }
}

impl<H: WebhookHandler> Clone for Router<H> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            webhook_path: Arc::clone(&self.webhook_path),
        }
    }
}

impl<H, B> Service<http::Request<B>> for Router<H>
where
    H: WebhookHandler,
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<GateBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        if is_health_check(req.method(), req.uri().path()) {
            return Box::pin(async { Ok(health_check_response()) });
        }

        if req.uri().path() == &*self.webhook_path {
            return self.gate.call(req);
        }

        Box::pin(async { Ok(status_response(http::StatusCode::NOT_FOUND)) })
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce the health check response.
fn health_check_response() -> http::Response<GateBody> {
    let body = serde_json::json!({ "status": "running", "version": VERSION });
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(GateBody::new(body.to_string()))
        .expect("static health response should be valid")
}
