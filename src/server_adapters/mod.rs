//! Server adapters: turn event streams as framework responses.
//!
//! This module converts a [`TurnStream`] into the SSE wire format consumed
//! by chat frontends: one `data:` frame per event, the event kind carried
//! as the `type` discriminant inside the JSON payload.
//!
//! ## Features
//!
//! - **Framework-agnostic helper**: [`sse_frames`] yields ready-to-write frames
//! - **Axum integration**: `axum::to_sse_response()` (requires `server-adapters` feature)
//! - **Error masking**: configurable error message sanitization for production
//!
//! ## Example (framework-agnostic)
//!
//! ```rust,no_run
//! use fabchat::server_adapters::{sse_frames, SseOptions};
//! use fabchat::stream::TurnStream;
//! use futures::StreamExt;
//!
//! async fn forward(stream: TurnStream) {
//!     let mut frames = sse_frames(stream, SseOptions::production());
//!     while let Some(frame) = frames.next().await {
//!         print!("{frame}");
//!     }
//! }
//! ```
//!
//! ## Example (Axum)
//!
//! ```rust,no_run
//! #[cfg(feature = "server-adapters")]
//! use fabchat::server_adapters::axum::to_sse_response;
//! use fabchat::stream::TurnStream;
//! use axum::response::sse::Sse;
//!
//! #[cfg(feature = "server-adapters")]
//! async fn chat_handler(
//!     stream: TurnStream,
//! ) -> Sse<impl futures::Stream<Item = Result<axum::response::sse::Event, std::convert::Infallible>> + Send>
//! {
//!     to_sse_response(stream, Default::default())
//! }
//! ```

use std::pin::Pin;

use futures::Stream;
use futures::StreamExt;

use crate::stream::TurnStream;
use crate::types::TurnEvent;

#[cfg(feature = "server-adapters")]
pub mod axum;

/// Options for SSE encoding.
#[derive(Debug, Clone)]
pub struct SseOptions {
    /// Whether to mask error messages for security.
    ///
    /// When `true`, replaces error event text with a fixed message.
    /// Recommended for production environments to avoid leaking sensitive
    /// information. Default: `true`
    pub mask_errors: bool,

    /// Custom error message to use when `mask_errors` is `true`.
    ///
    /// If `None`, uses "internal error" as the default masked message.
    /// Default: `None`
    pub masked_error_message: Option<String>,
}

impl Default for SseOptions {
    fn default() -> Self {
        Self {
            mask_errors: true,
            masked_error_message: None,
        }
    }
}

impl SseOptions {
    /// Create options suitable for development (errors not masked).
    pub fn development() -> Self {
        Self {
            mask_errors: false,
            ..Default::default()
        }
    }

    /// Create options suitable for production (errors masked).
    pub fn production() -> Self {
        Self {
            mask_errors: true,
            ..Default::default()
        }
    }

    fn masked_text(&self) -> String {
        self.masked_error_message
            .clone()
            .unwrap_or_else(|| "internal error".to_string())
    }
}

fn apply_mask(event: TurnEvent, opts: &SseOptions) -> TurnEvent {
    match event {
        TurnEvent::Error { .. } if opts.mask_errors => TurnEvent::Error {
            error: opts.masked_text(),
        },
        other => other,
    }
}

fn frame(event: &TurnEvent) -> String {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    format!("data: {data}\n\n")
}

/// Encode a turn's events as SSE frames.
///
/// Every event becomes one `data: {json}\n\n` frame. The encoded stream
/// always ends with a terminal frame: when the underlying turn stops
/// without one (caller cancellation, worker crash), an error frame is
/// appended so the consumer never waits on a silent connection.
pub fn sse_frames(
    stream: TurnStream,
    opts: SseOptions,
) -> Pin<Box<dyn Stream<Item = String> + Send>> {
    let s = async_stream::stream! {
        let mut stream = stream;
        let mut saw_terminal = false;
        while let Some(event) = stream.next().await {
            let event = apply_mask(event, &opts);
            if event.is_terminal() {
                saw_terminal = true;
            }
            yield frame(&event);
        }
        if !saw_terminal {
            let fallback = apply_mask(
                TurnEvent::Error {
                    error: "stream ended unexpectedly".to_string(),
                },
                &opts,
            );
            yield frame(&fallback);
        }
    };
    Box::pin(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn turn_stream(events: Vec<TurnEvent>) -> TurnStream {
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            for event in events {
                let _ = tx.send(event).await;
            }
        });
        TurnStream::new(rx)
    }

    fn parse_frame(frame: &str) -> Value {
        let body = frame
            .strip_prefix("data: ")
            .and_then(|rest| rest.strip_suffix("\n\n"))
            .unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn frames_carry_type_discriminant() {
        let stream = turn_stream(vec![
            TurnEvent::Content {
                content: "안녕".to_string(),
            },
            TurnEvent::Done {
                conversation_id: "c-1".to_string(),
            },
        ]);
        let frames: Vec<String> = sse_frames(stream, SseOptions::default()).collect().await;

        assert_eq!(frames.len(), 2);
        let first = parse_frame(&frames[0]);
        assert_eq!(first["type"], "content");
        assert_eq!(first["content"], "안녕");
        let last = parse_frame(&frames[1]);
        assert_eq!(last["type"], "done");
        assert_eq!(last["conversationId"], "c-1");
    }

    #[tokio::test]
    async fn production_masks_error_text() {
        let stream = turn_stream(vec![TurnEvent::Error {
            error: "upstream error (status 502)".to_string(),
        }]);
        let frames: Vec<String> = sse_frames(stream, SseOptions::production()).collect().await;

        let parsed = parse_frame(&frames[0]);
        assert_eq!(parsed["error"], "internal error");
    }

    #[tokio::test]
    async fn development_keeps_error_text() {
        let stream = turn_stream(vec![TurnEvent::Error {
            error: "upstream error (status 502)".to_string(),
        }]);
        let frames: Vec<String> = sse_frames(stream, SseOptions::development())
            .collect()
            .await;

        let parsed = parse_frame(&frames[0]);
        assert_eq!(parsed["error"], "upstream error (status 502)");
    }

    #[tokio::test]
    async fn custom_masked_message_is_used() {
        let stream = turn_stream(vec![TurnEvent::Error {
            error: "secret detail".to_string(),
        }]);
        let opts = SseOptions {
            mask_errors: true,
            masked_error_message: Some("일시적인 오류가 발생했습니다".to_string()),
        };
        let frames: Vec<String> = sse_frames(stream, opts).collect().await;

        let parsed = parse_frame(&frames[0]);
        assert_eq!(parsed["error"], "일시적인 오류가 발생했습니다");
    }

    #[tokio::test]
    async fn missing_terminal_is_replaced_with_error_frame() {
        let stream = turn_stream(vec![TurnEvent::Content {
            content: "부분".to_string(),
        }]);
        let frames: Vec<String> = sse_frames(stream, SseOptions::default()).collect().await;

        assert_eq!(frames.len(), 2);
        let last = parse_frame(&frames[1]);
        assert_eq!(last["type"], "error");
        assert_eq!(last["error"], "internal error");
    }
}
