//! Axum-specific server adapters
//!
//! This module converts a [`TurnStream`] into Axum-compatible SSE responses.
//!
//! ## Features
//!
//! - **SSE Response**: `to_sse_response()` converts `TurnStream` to `Sse<impl Stream>`
//! - **Error Handling**: automatic error masking for production environments
//! - **Keep-alive**: periodic comment frames so proxies do not drop idle connections
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::response::sse::Sse;
//! use fabchat::server_adapters::SseOptions;
//! use fabchat::server_adapters::axum::to_sse_response;
//! use fabchat::stream::TurnStream;
//!
//! async fn chat_handler(
//!     stream: TurnStream,
//! ) -> Sse<impl futures::Stream<Item = Result<axum::response::sse::Event, std::convert::Infallible>> + Send>
//! {
//!     to_sse_response(stream, SseOptions::production())
//! }
//! ```

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::server_adapters::SseOptions;
use crate::stream::TurnStream;
use crate::types::TurnEvent;

/// Convert a [`TurnStream`] into an Axum SSE response.
///
/// Each event becomes a data-only frame; the consumer dispatches on the
/// `type` discriminant inside the JSON payload. As with
/// [`sse_frames`](super::sse_frames), the response always ends with a
/// terminal frame even when the underlying turn stops without one.
///
/// ## Arguments
///
/// - `stream`: the turn's event stream
/// - `opts`: SSE encoding options (use `SseOptions::production()` for production)
///
/// ## Returns
///
/// An `Sse<impl Stream>` that can be returned directly from an Axum handler.
pub fn to_sse_response(
    stream: TurnStream,
    opts: SseOptions,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    let event_stream = async_stream::stream! {
        let mut stream = stream;
        let mut saw_terminal = false;
        while let Some(event) = stream.next().await {
            let event = super::apply_mask(event, &opts);
            if event.is_terminal() {
                saw_terminal = true;
            }
            yield encode(&event);
        }
        if !saw_terminal {
            let fallback = super::apply_mask(
                TurnEvent::Error {
                    error: "stream ended unexpectedly".to_string(),
                },
                &opts,
            );
            yield encode(&fallback);
        }
    };

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

fn encode(event: &TurnEvent) -> Result<Event, Infallible> {
    let data = serde_json::to_string(event)
        .unwrap_or_else(|_| r#"{"type":"error","error":"internal error"}"#.to_string());
    Ok(Event::default().data(data))
}
