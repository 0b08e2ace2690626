//! Continuations the gate delegates to.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;

use crate::body::GateBody;

/// Boxed future returned by [`WebhookHandler::handle`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = http::Response<GateBody>> + Send>>;

/// A request handler the gate can delegate to.
///
/// The handler receives the request with its body already buffered, since
/// the gate had to read it to verify the signature. Any `Fn(Request<Bytes>)`
/// returning a `Send` future of a response implements this trait.
pub trait WebhookHandler: Send + Sync + 'static {
    /// Handle a webhook request and produce an HTTP response.
    fn handle(&self, req: http::Request<Bytes>) -> HandlerFuture;
}

impl<F, Fut> WebhookHandler for F
where
    F: Fn(http::Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = http::Response<GateBody>> + Send + 'static,
{
    fn handle(&self, req: http::Request<Bytes>) -> HandlerFuture {
        Box::pin(self(req))
    }
}

/// What the gate does with a request that fails verification.
#[derive(Clone, Default)]
pub enum OnReject {
    /// Answer `403 Forbidden` and stop.
    #[default]
    Forbidden,
    /// Hand the request to a custom handler, e.g. to log and proceed.
    Delegate(Arc<dyn WebhookHandler>),
}

impl OnReject {
    /// Delegate rejected requests to `handler`.
    pub fn delegate(handler: impl WebhookHandler) -> Self {
        Self::Delegate(Arc::new(handler))
    }
}

impl fmt::Debug for OnReject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden => f.write_str("Forbidden"),
            Self::Delegate(_) => f.write_str("Delegate(..)"),
        }
    }
}
