//! Fixture helpers: load SSE chunk files and drive the stream decoder.

use std::io;

use futures_util::StreamExt;

use fabchat::decode::{ChunkDecoder, STREAM_DONE_SENTINEL};
use fabchat::error::EngineError;
use fabchat::types::StreamDelta;
use fabchat::utils::sse_stream::SseStreamExt;

/// Load an `.sse` fixture file and split it into SSE records (separated by
/// blank lines), returning them as a byte-chunk sequence.
pub fn load_sse_fixture_as_bytes(
    path: &str,
) -> io::Result<Vec<Result<Vec<u8>, EngineError>>> {
    let raw = std::fs::read_to_string(path)?;
    // Normalize line endings
    let normalized = raw.replace("\r\n", "\n");
    let mut out = Vec::new();
    for chunk in normalized.split("\n\n") {
        let record = chunk.trim_end_matches('\n');
        if record.is_empty() {
            continue;
        }
        // Restore the SSE blank-line terminator
        let mut owned = String::from(record);
        owned.push_str("\n\n");
        out.push(Ok(owned.into_bytes()));
    }
    Ok(out)
}

/// Decode a byte-chunk sequence the way the gateway does: SSE parsing,
/// stop at the `[DONE]` sentinel, then per-record conversion.
pub async fn collect_deltas(
    bytes: Vec<Result<Vec<u8>, EngineError>>,
    decoder: ChunkDecoder,
) -> Vec<StreamDelta> {
    let byte_stream = futures_util::stream::iter(bytes);
    let mut sse_stream = byte_stream.into_sse_stream();

    let mut deltas = Vec::new();
    while let Some(item) = sse_stream.next().await {
        let event = item.expect("valid SSE record");
        if event.data.trim() == STREAM_DONE_SENTINEL {
            break;
        }
        for delta in decoder.convert_event(event) {
            deltas.push(delta.expect("decode ok"));
        }
    }
    deltas
}
