//! Continuations wired behind the gate.

use bytes::Bytes;
use tracing::{info, warn};

use hookgate_http::{GateBody, OnReject};

/// Empty TwiML document acknowledging a webhook without further instructions.
const EMPTY_TWIML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";

/// Acknowledge an authenticated webhook.
pub async fn acknowledge(req: http::Request<Bytes>) -> http::Response<GateBody> {
    info!(
        method = %req.method(),
        path = req.uri().path(),
        body_bytes = req.body().len(),
        "accepted webhook"
    );

    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "text/xml")
        .body(GateBody::new(EMPTY_TWIML))
        .expect("static TwiML response should be valid")
}

/// Rejection continuation for report-only mode: log, then accept anyway.
///
/// Lets an operator turn verification on against live traffic and watch for
/// failures before enforcing it.
pub fn report_only() -> OnReject {
    OnReject::delegate(|req: http::Request<Bytes>| {
        warn!(
            method = %req.method(),
            path = req.uri().path(),
            "webhook signature validation failed, proceeding in report-only mode"
        );
        acknowledge(req)
    })
}
