//! Request-level verification.
//!
//! Ties the pieces together for an HTTP request whose body has already been
//! read:
//!
//! 1. Look up the signature header (case-insensitive).
//! 2. Extract form fields for form-encoded POST bodies.
//! 3. Build the canonical string from the absolute URL and the fields.
//! 4. Check the transmitted signature in constant time.

use tracing::debug;

use crate::canonical::{build_canonical_string, form_for_request};
use crate::error::AuthError;
use crate::secret::Secret;
use crate::signature::check_signature;

/// Header the signer uses by default to transmit the signature.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-twilio-signature";

/// Validate a request, reporting why it failed.
///
/// `url` must be the absolute URL the signer requested, including scheme,
/// host and raw query string. Servers usually only see the origin-form target,
/// so the caller is responsible for rebuilding it.
///
/// # Errors
///
/// Returns an [`AuthError`] if the signature header is missing or unreadable,
/// is not valid base64, or does not match.
pub fn validate_request(
    secret: &Secret,
    parts: &http::request::Parts,
    url: &str,
    body: &[u8],
    signature_header: &http::HeaderName,
) -> Result<(), AuthError> {
    let transmitted = parts
        .headers
        .get(signature_header)
        .ok_or_else(|| AuthError::MissingSignatureHeader(signature_header.to_string()))?
        .to_str()
        .map_err(|_| AuthError::InvalidSignatureHeader(signature_header.to_string()))?;

    let fields = form_for_request(&parts.method, &parts.headers, body);
    let canonical = build_canonical_string(&parts.method, url, &fields);

    debug!(
        method = %parts.method,
        url,
        form_fields = fields.len(),
        "Built webhook canonical string"
    );

    check_signature(secret, &canonical, transmitted).inspect_err(|err| {
        debug!(url, error = %err, "Webhook signature verification failed");
    })
}

/// Whether a request carries a valid signature.
///
/// Every failure, including a missing or malformed header, yields `false`.
#[must_use]
pub fn verify_request(
    secret: &Secret,
    parts: &http::request::Parts,
    url: &str,
    body: &[u8],
    signature_header: &http::HeaderName,
) -> bool {
    validate_request(secret, parts, url, body, signature_header).is_ok()
}
