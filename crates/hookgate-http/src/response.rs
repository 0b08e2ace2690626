//! Plain-text status responses.

use crate::body::GateBody;

/// Content type for plain-text status responses.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build a plain-text response whose body is the status line, e.g. `403 Forbidden`.
#[must_use]
pub fn status_response(status: http::StatusCode) -> http::Response<GateBody> {
    let body = format!(
        "{} {}\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );

    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .header(http::header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(GateBody::new(body))
        .expect("valid status response")
}

/// The default response for requests that fail verification.
#[must_use]
pub fn forbidden() -> http::Response<GateBody> {
    status_response(http::StatusCode::FORBIDDEN)
}
