//! OpenAI-compatible streaming fixtures tests

use fabchat::assemble::ToolCallAssembler;
use fabchat::decode::ChunkDecoder;
use fabchat::types::{FinishReason, StreamDelta};
use serde_json::json;

#[path = "../support/stream_fixture.rs"]
mod support;

#[tokio::test]
async fn content_only_fixture_concatenates_in_order() {
    let bytes = support::load_sse_fixture_as_bytes("tests/fixtures/openai/content_only.sse")
        .expect("load fixture");

    let deltas = support::collect_deltas(bytes, ChunkDecoder::new()).await;

    let mut content = String::new();
    let mut finish = None;
    for delta in &deltas {
        match delta {
            StreamDelta::Content(text) => content.push_str(text),
            StreamDelta::Finish(reason) => finish = Some(reason.clone()),
            other => panic!("unexpected delta: {other:?}"),
        }
    }
    assert_eq!(content, "현재 온도는 23.5도입니다.");
    assert_eq!(finish, Some(FinishReason::Stop));
    // The empty leading fragment is dropped, so three content deltas remain.
    assert_eq!(deltas.len(), 4);
}

#[tokio::test]
async fn tool_call_fixture_reassembles_interleaved_slots() {
    let bytes = support::load_sse_fixture_as_bytes("tests/fixtures/openai/tool_call_fragments.sse")
        .expect("load fixture");

    let deltas = support::collect_deltas(bytes, ChunkDecoder::new()).await;

    let mut assembler = ToolCallAssembler::new();
    let mut finish = None;
    for delta in deltas {
        match delta {
            StreamDelta::ToolCall {
                slot_index,
                name,
                arguments,
            } => assembler.ingest(slot_index, name.as_deref(), &arguments),
            StreamDelta::Finish(reason) => finish = Some(reason),
            StreamDelta::Content(text) => panic!("unexpected content: {text}"),
        }
    }
    assert_eq!(finish, Some(FinishReason::ToolCalls));

    let completed = assembler.flush();
    assert_eq!(completed.len(), 2);
    assert_eq!(completed[0].name, "get_sensor_data");
    assert_eq!(completed[0].arguments, json!({"sensor_type": "temperature"}));
    assert_eq!(completed[1].name, "list_equipment");
    assert_eq!(completed[1].arguments, json!({}));
}

#[tokio::test]
async fn malformed_record_does_not_abort_the_stream() {
    let bytes =
        support::load_sse_fixture_as_bytes("tests/fixtures/openai/malformed_interleaved.sse")
            .expect("load fixture");

    let deltas = support::collect_deltas(bytes, ChunkDecoder::new()).await;

    let mut content = String::new();
    for delta in &deltas {
        if let StreamDelta::Content(text) = delta {
            content.push_str(text);
        }
    }
    assert_eq!(content, "압력은 정상 범위입니다.");
    assert!(matches!(
        deltas.last(),
        Some(StreamDelta::Finish(FinishReason::Stop))
    ));
}

#[tokio::test]
async fn records_after_the_done_sentinel_are_ignored() {
    let bytes = support::load_sse_fixture_as_bytes("tests/fixtures/openai/content_after_done.sse")
        .expect("load fixture");

    let deltas = support::collect_deltas(bytes, ChunkDecoder::new()).await;

    assert_eq!(deltas.len(), 2);
    assert!(matches!(
        deltas[0],
        StreamDelta::Content(ref text) if text == "완료"
    ));
    assert!(matches!(
        deltas[1],
        StreamDelta::Finish(FinishReason::Stop)
    ));
}
