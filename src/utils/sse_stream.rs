//! SSE parsing built on eventsource-stream.
//!
//! eventsource-stream handles UTF-8 boundaries, line buffering and SSE
//! framing; this module only adapts its output to engine errors.

use std::pin::Pin;

use eventsource_stream::{Event, Eventsource};
use futures::{Stream, StreamExt};

use crate::error::EngineError;

/// A parsed stream of SSE events.
pub type SseStream = Pin<Box<dyn Stream<Item = Result<Event, EngineError>> + Send>>;

/// Extension trait turning a byte stream into an [`SseStream`].
pub trait SseStreamExt {
    fn into_sse_stream(self) -> SseStream;
}

impl<S, B> SseStreamExt for S
where
    S: Stream<Item = Result<B, EngineError>> + Send + 'static,
    B: AsRef<[u8]>,
{
    fn into_sse_stream(self) -> SseStream {
        let stream = self
            .eventsource()
            .map(|item| item.map_err(|e| EngineError::ParseError(format!("SSE parse error: {e}"))));
        Box::pin(stream)
    }
}
