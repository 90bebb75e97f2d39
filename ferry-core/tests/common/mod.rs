//! Common test utilities shared across test files.
#![allow(dead_code)]

use async_trait::async_trait;
use ferry_core::{
    AgentRuntime, AguiEvent, EventTranslator, RunInput, RuntimeError, RuntimeEvent,
    RuntimeEventStream,
};

// ===== Scripted runtime =====

/// Replays a fixed list of events for every run.
pub struct ScriptedRuntime {
    events: Vec<RuntimeEvent>,
}

impl ScriptedRuntime {
    pub fn new(events: Vec<RuntimeEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn run(&self, _input: &RunInput) -> Result<RuntimeEventStream, RuntimeError> {
        let events: Vec<Result<RuntimeEvent, RuntimeError>> =
            self.events.iter().cloned().map(Ok).collect();
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

// ===== Helpers =====

/// Translate a whole sequence the way a run driver would, closing any
/// span left open at the end.
pub fn drive(translator: &mut EventTranslator, events: &[RuntimeEvent]) -> Vec<AguiEvent> {
    let mut out = Vec::new();
    for event in events {
        out.extend(
            translator
                .translate(event, "thread-1", "run-1")
                .expect("translation failed"),
        );
    }
    out.extend(translator.force_close_thinking_message());
    out.extend(translator.force_close_streaming_message());
    out
}

pub fn types(events: &[AguiEvent]) -> Vec<&'static str> {
    events.iter().map(AguiEvent::event_type).collect()
}

/// Concatenated text deltas of all text messages.
pub fn streamed_text(events: &[AguiEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            AguiEvent::TextMessageContent { delta, .. } => Some(delta.as_str()),
            _ => None,
        })
        .collect()
}

/// Asserts every started message and tool call is ended exactly once, in order.
pub fn assert_well_framed(events: &[AguiEvent]) {
    let mut open_text: Option<&str> = None;
    let mut open_thinking = false;
    let mut open_tool: Option<&str> = None;

    for event in events {
        match event {
            AguiEvent::TextMessageStart { message_id, .. } => {
                assert!(open_text.is_none(), "nested text message");
                open_text = Some(message_id.as_str());
            }
            AguiEvent::TextMessageContent { message_id, delta } => {
                assert_eq!(open_text, Some(message_id.as_str()));
                assert!(!delta.is_empty(), "empty text delta");
            }
            AguiEvent::TextMessageEnd { message_id } => {
                assert_eq!(open_text, Some(message_id.as_str()));
                open_text = None;
            }
            AguiEvent::ThinkingStart { .. } => {
                assert!(!open_thinking, "nested thinking message");
                open_thinking = true;
            }
            AguiEvent::ThinkingEnd => {
                assert!(open_thinking);
                open_thinking = false;
            }
            AguiEvent::ToolCallStart { tool_call_id, .. } => {
                assert!(open_tool.is_none(), "interleaved tool calls");
                open_tool = Some(tool_call_id.as_str());
            }
            AguiEvent::ToolCallArgs { tool_call_id, .. } => {
                assert_eq!(open_tool, Some(tool_call_id.as_str()));
            }
            AguiEvent::ToolCallEnd { tool_call_id } => {
                assert_eq!(open_tool, Some(tool_call_id.as_str()));
                open_tool = None;
            }
            _ => {}
        }
    }

    assert!(open_text.is_none(), "text message left open");
    assert!(!open_thinking, "thinking message left open");
    assert!(open_tool.is_none(), "tool call left open");
}
