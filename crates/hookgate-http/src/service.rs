//! Gate HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::debug;

use hookgate_auth::{DEFAULT_SIGNATURE_HEADER, Secret, verify_request};

use crate::body::GateBody;
use crate::error::GateError;
use crate::handler::{OnReject, WebhookHandler};
use crate::response::forbidden;
use crate::url::resolve_request_url;

/// Default limit on buffered request bodies (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for the gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Shared secret the sender signs with.
    pub secret: Secret,
    /// Header carrying the base64 signature.
    pub signature_header: http::HeaderName,
    /// Public scheme and authority used to rebuild origin-form request URLs.
    pub public_url: Option<String>,
    /// Scheme used with the `Host` header when `public_url` is unset.
    pub default_scheme: String,
    /// Maximum request body size read before verification.
    pub max_body_bytes: usize,
}

impl GateConfig {
    /// Create a configuration with default settings for `secret`.
    pub fn new(secret: impl Into<Secret>) -> Self {
        Self {
            secret: secret.into(),
            signature_header: http::HeaderName::from_static(DEFAULT_SIGNATURE_HEADER),
            public_url: None,
            default_scheme: "https".to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Hyper `Service` that verifies webhook signatures before delegating.
///
/// Authentic requests go to the protected handler; everything else goes to
/// the [`OnReject`] continuation. Exactly one of the two sees each request.
#[derive(Debug)]
pub struct GateService<H: WebhookHandler> {
    protected: Arc<H>,
    on_reject: OnReject,
    config: Arc<GateConfig>,
}

impl<H: WebhookHandler> GateService<H> {
    /// Create a new `GateService` that answers `403 Forbidden` on rejection.
    pub fn new(protected: Arc<H>, config: GateConfig) -> Self {
        Self {
            protected,
            on_reject: OnReject::Forbidden,
            config: Arc::new(config),
        }
    }

    /// Replace the rejection continuation.
    #[must_use]
    pub fn with_on_reject(mut self, on_reject: OnReject) -> Self {
        self.on_reject = on_reject;
        self
    }

    /// The gate configuration.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

impl<H: WebhookHandler> Clone for GateService<H> {
    fn clone(&self) -> Self {
        Self {
            protected: Arc::clone(&self.protected),
            on_reject: self.on_reject.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

/// Wrap `protected` so it only sees requests signed with `secret`.
///
/// # Examples
///
/// ```
/// use hookgate_http::{GateBody, OnReject, gate};
///
/// let service = gate(
///     "12345",
///     |_req: http::Request<bytes::Bytes>| async { http::Response::new(GateBody::empty()) },
///     OnReject::Forbidden,
/// );
/// assert_eq!(service.config().signature_header, "x-twilio-signature");
/// ```
pub fn gate<H: WebhookHandler>(
    secret: impl Into<Secret>,
    protected: H,
    on_reject: OnReject,
) -> GateService<H> {
    GateService::new(Arc::new(protected), GateConfig::new(secret)).with_on_reject(on_reject)
}

impl<H, B> hyper::service::Service<http::Request<B>> for GateService<H>
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
        let protected = Arc::clone(&self.protected);
        let on_reject = self.on_reject.clone();
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let response = process_request(req, protected.as_ref(), &on_reject, &config).await;
            Ok(response)
        })
    }
}

/// Verify one request and hand it to the matching continuation.
async fn process_request<H, B>(
    req: http::Request<B>,
    protected: &H,
    on_reject: &OnReject,
    config: &GateConfig,
) -> http::Response<GateBody>
where
    H: WebhookHandler,
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, incoming) = req.into_parts();

    let body = match collect_body(incoming, config.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => {
            debug!(error = %err, "Failed to read webhook request body");
            return err.into_response();
        }
    };

    let url = resolve_request_url(
        &parts,
        config.public_url.as_deref(),
        &config.default_scheme,
    );
    let authentic = verify_request(
        &config.secret,
        &parts,
        &url,
        &body,
        &config.signature_header,
    );

    let req = http::Request::from_parts(parts, body);
    if authentic {
        return protected.handle(req).await;
    }

    match on_reject {
        OnReject::Forbidden => forbidden(),
        OnReject::Delegate(handler) => handler.handle(req).await,
    }
}

/// Collect the incoming body into a single `Bytes` buffer, up to `limit` bytes.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, GateError>
where
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                GateError::BodyTooLarge(limit)
            } else {
                GateError::BodyRead(e.to_string())
            }
        })
}
