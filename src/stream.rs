//! Stream type aliases and the outward turn stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::error::EngineError;
use crate::types::{StreamDelta, TurnEvent};
use crate::utils::cancel::CancelHandle;

/// Decoded generation stream: one item per upstream delta.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<StreamDelta, EngineError>> + Send>>;

/// The outward event stream of one assistant turn.
///
/// Backed by the bounded channel the turn task writes into. Errors are
/// in-band ([`TurnEvent::Error`]); the stream itself is infallible and ends
/// after the terminal event.
pub struct TurnStream {
    rx: mpsc::Receiver<TurnEvent>,
}

impl TurnStream {
    pub(crate) fn new(rx: mpsc::Receiver<TurnEvent>) -> Self {
        Self { rx }
    }
}

impl Stream for TurnStream {
    type Item = TurnEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Handle returned by `ChatOrchestrator::stream_turn`: the event stream plus
/// a cancel handle for caller disconnects.
pub struct TurnHandle {
    pub stream: TurnStream,
    pub cancel: CancelHandle,
}

static_assertions::assert_impl_all!(TurnStream: Send);
static_assertions::assert_impl_all!(TurnHandle: Send);
