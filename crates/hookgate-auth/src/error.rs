//! Error types for webhook signature verification.
//!
//! The public verdict API ([`verify_signature`](crate::signature::verify_signature),
//! [`verify_request`](crate::request::verify_request)) collapses every failure into
//! `false`. [`AuthError`] exists for callers that want to know *why* a request was
//! rejected, e.g. to emit a diagnostic before answering 403.

/// Reasons a webhook request fails signature verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The signature header is absent from the request.
    #[error("Missing signature header: {0}")]
    MissingSignatureHeader(String),

    /// The signature header value is not visible ASCII.
    #[error("Invalid signature header: {0}")]
    InvalidSignatureHeader(String),

    /// The signature header is not valid standard base64.
    #[error("Signature is not valid base64")]
    InvalidSignatureEncoding,

    /// The computed signature does not match the transmitted one.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
