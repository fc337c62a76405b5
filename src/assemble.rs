//! Reassembly of streamed tool-call fragments.
//!
//! Tool calls arrive split across many chunks, each tagged with a slot
//! index so concurrent calls can interleave. [`ToolCallAssembler`] merges
//! the fragments per slot and produces [`CompletedToolCall`]s once the
//! upstream signals the turn finished because of tool calls.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::CompletedToolCall;

#[derive(Debug, Default)]
struct SlotFragment {
    name: String,
    arguments: String,
}

/// Accumulates tool-call fragments for the lifetime of one stream.
///
/// Names set on a slot survive later unnamed fragments; argument text is
/// append-only. Flushing preserves the order in which slots first appeared.
#[derive(Debug, Default)]
pub struct ToolCallAssembler {
    slots: HashMap<u32, SlotFragment>,
    order: Vec<u32>,
}

impl ToolCallAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fragment into its slot, creating the slot on first sight.
    pub fn ingest(&mut self, slot_index: u32, name: Option<&str>, arguments: &str) {
        let slot = match self.slots.entry(slot_index) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push(slot_index);
                entry.insert(SlotFragment::default())
            }
        };
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            slot.name = name.to_string();
        }
        slot.arguments.push_str(arguments);
    }

    /// Produce completed calls in slot insertion order, consuming the
    /// assembler.
    ///
    /// Slots that never received a name are dropped. Accumulated argument
    /// text that fails to parse as a JSON object is replaced with an empty
    /// object rather than failing the turn.
    pub fn flush(mut self) -> Vec<CompletedToolCall> {
        let mut completed = Vec::new();
        for slot_index in self.order {
            let Some(fragment) = self.slots.remove(&slot_index) else {
                continue;
            };
            if fragment.name.is_empty() {
                tracing::debug!(slot_index, "dropping unnamed tool-call slot");
                continue;
            }
            let arguments = serde_json::from_str(&fragment.arguments)
                .unwrap_or_else(|_| serde_json::json!({}));
            completed.push(CompletedToolCall {
                name: fragment.name,
                arguments,
            });
        }
        completed
    }
}
