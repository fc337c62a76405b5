//! Decoding of the chunked generation stream.
//!
//! The upstream replies with SSE records, each carrying one JSON chunk in
//! the OpenAI-compatible shape (`choices[0].delta` plus `finish_reason`).
//! [`ChunkDecoder`] turns single records into [`StreamDelta`]s;
//! [`open_delta_stream`] wires a sent request into a decoded stream.

use eventsource_stream::Event;
use futures::StreamExt;
use serde::Deserialize;

use crate::error::EngineError;
use crate::stream::DeltaStream;
use crate::types::{FinishReason, StreamDelta};
use crate::utils::sse_stream::SseStreamExt;

/// Sentinel payload that ends the upstream stream cleanly.
pub const STREAM_DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct ChunkRecord {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallChunk>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallChunk {
    #[serde(default)]
    index: u32,
    function: Option<FunctionChunk>,
}

#[derive(Debug, Deserialize)]
struct FunctionChunk {
    name: Option<String>,
    arguments: Option<String>,
}

/// Stateless converter from SSE records to stream deltas.
#[derive(Debug, Clone, Default)]
pub struct ChunkDecoder;

impl ChunkDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Convert one SSE record into zero or more deltas.
    ///
    /// Records whose data is not valid JSON are skipped; a single corrupt
    /// record never aborts the stream. A record can carry a tool-call
    /// fragment and a finish signal at once, in which case both deltas are
    /// produced in that order.
    pub fn convert_event(&self, event: Event) -> Vec<Result<StreamDelta, EngineError>> {
        let record: ChunkRecord = match serde_json::from_str(&event.data) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed stream record");
                return Vec::new();
            }
        };
        let Some(choice) = record.choices.into_iter().next() else {
            return Vec::new();
        };

        let mut deltas = Vec::new();

        // A record that carries tool-call fragments never carries visible
        // content; the content branch only runs when no fragments arrived.
        if let Some(calls) = choice.delta.tool_calls.filter(|calls| !calls.is_empty()) {
            for call in calls {
                let (name, arguments) = match call.function {
                    Some(function) => (function.name, function.arguments.unwrap_or_default()),
                    None => (None, String::new()),
                };
                deltas.push(Ok(StreamDelta::ToolCall {
                    slot_index: call.index,
                    name,
                    arguments,
                }));
            }
        } else if let Some(content) = choice.delta.content {
            // Empty content fragments carry no information; drop them here
            // so consumers never see zero-length deltas.
            if !content.is_empty() {
                deltas.push(Ok(StreamDelta::Content(content)));
            }
        }

        if let Some(reason) = choice.finish_reason {
            deltas.push(Ok(StreamDelta::Finish(FinishReason::from_wire(&reason))));
        }

        deltas
    }
}

/// Send a prepared request and decode its SSE body into a delta stream.
///
/// A non-success status is fatal and carries the response body. The stream
/// ends at the `[DONE]` sentinel; dropping the returned stream releases the
/// underlying connection.
pub async fn open_delta_stream(
    request_builder: reqwest::RequestBuilder,
    decoder: ChunkDecoder,
) -> Result<DeltaStream, EngineError> {
    let response = request_builder
        .send()
        .await
        .map_err(|e| EngineError::HttpError(format!("Failed to send request: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(EngineError::api_error(status.as_u16(), error_text));
    }

    let byte_stream = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(|e| EngineError::StreamError(format!("Stream error: {e}"))));

    let sse_stream = byte_stream.into_sse_stream();

    let delta_stream = sse_stream
        .take_while(|item| {
            let done = matches!(item, Ok(event) if event.data.trim() == STREAM_DONE_SENTINEL);
            futures::future::ready(!done)
        })
        .map(move |item| match item {
            Ok(event) => decoder.convert_event(event),
            Err(e) => vec![Err(e)],
        })
        .flat_map(futures::stream::iter);

    Ok(Box::pin(delta_stream))
}
