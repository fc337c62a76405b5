//! Stream deltas and caller-visible turn events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why the upstream finished a generation phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of the response.
    Stop,
    /// The model stopped to request tool execution.
    ToolCalls,
    /// Any other reason reported by the upstream (length, filter, ...).
    Other(String),
}

impl FinishReason {
    /// Map the wire string to a reason.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" => Self::Stop,
            "tool_calls" => Self::ToolCalls,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One incremental unit of decoded upstream output.
#[derive(Debug, Clone)]
pub enum StreamDelta {
    /// A non-empty fragment of assistant text.
    Content(String),
    /// A fragment of a tool invocation, keyed by slot index.
    ///
    /// `name` is only present on the fragment that introduces the call;
    /// `arguments` may be empty and accumulates across fragments.
    ToolCall {
        slot_index: u32,
        name: Option<String>,
        arguments: String,
    },
    /// The upstream closed a generation phase.
    Finish(FinishReason),
}

/// Caller-visible event of one assistant turn.
///
/// Serializes to the outward wire shape: a `type` discriminant in
/// `{content, chart, done, error}` with the payload key matching the
/// variant. Exactly one terminal event (`Done` or `Error`) ends every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TurnEvent {
    Content {
        content: String,
    },
    Chart {
        #[serde(rename = "chartData")]
        chart_data: Value,
    },
    Done {
        #[serde(rename = "conversationId")]
        conversation_id: String,
    },
    Error {
        error: String,
    },
}

impl TurnEvent {
    /// Whether this event ends the turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}
