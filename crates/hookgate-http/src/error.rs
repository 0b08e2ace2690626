//! Transport-level failures that happen before verification can run.

use crate::body::GateBody;
use crate::response::status_response;

/// Errors raised while reading a webhook request.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The request body could not be read from the connection.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The request body exceeds the configured limit.
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),
}

impl GateError {
    /// HTTP status code reported for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::BodyRead(_) => http::StatusCode::BAD_REQUEST,
            Self::BodyTooLarge(_) => http::StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Render this error as a plain-text response.
    #[must_use]
    pub fn into_response(self) -> http::Response<GateBody> {
        status_response(self.status_code())
    }
}
