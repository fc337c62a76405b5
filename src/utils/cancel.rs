//! Cancellation for in-flight generation streams.
//!
//! A turn hands its caller a [`CancelHandle`]; flipping it stops the wrapped
//! stream at the next item boundary, and dropping the stopped stream closes
//! the upstream connection so no further tokens are generated.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::stream::DeltaStream;

/// Shared flag that requests cooperative cancellation.
///
/// Clones observe the same flag, so one handle can be split between the
/// caller and the task doing the work.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation. Takes effect at the next item boundary of any
    /// stream wrapped with this handle's flag.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::default()
}

/// Wrap a delta stream so it honors a fresh [`CancelHandle`].
pub fn make_cancellable_stream(stream: DeltaStream) -> (DeltaStream, CancelHandle) {
    let handle = new_cancel_handle();
    let observer = handle.clone();
    let mut inner = stream;
    let wrapped = async_stream::stream! {
        use futures::StreamExt;
        while let Some(item) = inner.next().await {
            // An item that raced the cancellation is dropped, not yielded.
            if observer.is_cancelled() {
                break;
            }
            yield item;
        }
    };
    (Box::pin(wrapped), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    use crate::types::StreamDelta;

    #[tokio::test]
    async fn cancelled_stream_stops_yielding() {
        let inner = async_stream::stream! {
            for i in 0..10u32 {
                yield Ok(StreamDelta::Content(format!("{i}")));
            }
        };
        let (mut stream, handle) = make_cancellable_stream(Box::pin(inner));

        let first = stream.next().await;
        assert!(first.is_some());
        handle.cancel();
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn clones_observe_the_same_flag() {
        let handle = new_cancel_handle();
        let observer = handle.clone();
        assert!(!observer.is_cancelled());
        handle.cancel();
        assert!(observer.is_cancelled());
    }
}
