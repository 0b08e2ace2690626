//! Gate HTTP response body type.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Frame, SizeHint};

/// Response body produced by the gate and by webhook handlers.
///
/// Status pages and webhook acknowledgements are a few bytes, so the whole
/// body is held in memory and sent as a single data frame.
#[derive(Debug, Default)]
pub struct GateBody {
    data: Option<Bytes>,
}

impl GateBody {
    /// Create a body holding `data`.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            data: (!data.is_empty()).then_some(data),
        }
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl http_body::Body for GateBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().data.take().map(|data| Ok(Frame::data(data))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        let len = self.data.as_ref().map_or(0, Bytes::len);
        SizeHint::with_exact(len as u64)
    }
}
