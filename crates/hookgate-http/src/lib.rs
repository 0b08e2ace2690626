//! Webhook gate HTTP service for Hookgate.
//!
//! This crate turns signature verification into a hyper `Service`:
//!
//! - **Service**: buffers the body, rebuilds the signed URL, verifies, delegates
//! - **Handler trait**: the boundary between the gate and application logic
//! - **OnReject**: the default `403 Forbidden` or a custom continuation
//! - **URL resolution**: absolute URL reconstruction for origin-form targets

pub mod body;
pub mod error;
pub mod handler;
pub mod response;
pub mod service;
pub mod url;

pub use body::GateBody;
pub use error::GateError;
pub use handler::{HandlerFuture, OnReject, WebhookHandler};
pub use response::{forbidden, status_response};
pub use service::{GateConfig, GateService, gate};
