//! AG-UI protocol event types.
//!
//! These are the events a frontend consumes. On the wire every event is a
//! JSON object with a `type` discriminant in SCREAMING_SNAKE_CASE and
//! camelCase fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages::Message;
use crate::predict_state::PredictStateMapping;

/// `RUN_ERROR` code for failures inside the agent runtime.
pub const AGENT_ERROR: &str = "AGENT_ERROR";

/// `RUN_ERROR` code for events that could not be translated or encoded.
pub const ENCODING_ERROR: &str = "ENCODING_ERROR";

/// Name of the custom event carrying predictive state mappings.
pub const PREDICT_STATE: &str = "PredictState";

/// AG-UI protocol events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum AguiEvent {
    // ===== Lifecycle Events =====
    /// Agent run started.
    RunStarted {
        /// Thread ID for conversation continuity.
        thread_id: String,
        /// Unique run ID for this execution.
        run_id: String,
    },

    /// Agent run finished successfully.
    RunFinished {
        /// Thread ID for conversation continuity.
        thread_id: String,
        /// Unique run ID for this execution.
        run_id: String,
    },

    /// Agent run failed. Terminates the run.
    RunError {
        /// Error message describing the failure.
        message: String,
        /// Optional error code.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    // ===== Text Message Events =====
    /// Start of a new text message.
    TextMessageStart {
        /// Unique message ID.
        message_id: String,
        /// Role of the message author.
        role: MessageRole,
    },

    /// Incremental content for a text message. `delta` is never empty.
    TextMessageContent {
        /// Message ID this content belongs to.
        message_id: String,
        /// Text delta to append.
        delta: String,
    },

    /// End of a text message.
    TextMessageEnd {
        /// Message ID that is complete.
        message_id: String,
    },

    // ===== Thinking Events =====
    /// Start of a reasoning segment.
    ThinkingStart {
        /// Optional segment title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// End of a reasoning segment.
    ThinkingEnd,

    /// Start of a reasoning text message.
    ThinkingTextMessageStart {
        /// Unique message ID.
        message_id: String,
    },

    /// Incremental reasoning text.
    ThinkingTextMessageContent {
        /// Message ID this content belongs to.
        message_id: String,
        /// Text delta to append.
        delta: String,
    },

    /// End of a reasoning text message.
    ThinkingTextMessageEnd {
        /// Message ID that is complete.
        message_id: String,
    },

    // ===== Tool Call Events =====
    /// Start of a tool call.
    ToolCallStart {
        /// Unique tool call ID.
        tool_call_id: String,
        /// Name of the tool being called.
        tool_call_name: String,
        /// Id of the text message open when the call was made.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_message_id: Option<String>,
    },

    /// Incremental arguments for a tool call.
    ToolCallArgs {
        /// Tool call ID this belongs to.
        tool_call_id: String,
        /// JSON argument delta.
        delta: String,
    },

    /// End of tool call arguments.
    ToolCallEnd {
        /// Tool call ID that is complete.
        tool_call_id: String,
    },

    /// Result from a tool call.
    ToolCallResult {
        /// Unique message ID for this result.
        message_id: String,
        /// Tool call ID this result is for.
        tool_call_id: String,
        /// Serialized result content.
        content: String,
        /// Role (typically Tool).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<MessageRole>,
    },

    // ===== State Management Events =====
    /// Complete state snapshot.
    StateSnapshot {
        /// The complete state object.
        snapshot: Value,
    },

    /// Complete conversation history.
    MessagesSnapshot {
        /// Messages, oldest first.
        messages: Vec<Message>,
    },

    // ===== Extension Events =====
    /// Application-defined event.
    Custom {
        /// Event name.
        name: String,
        /// Event payload.
        value: Value,
    },
}

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message.
    User,
    /// Assistant message.
    Assistant,
    /// System message.
    System,
    /// Tool result message.
    Tool,
}

impl AguiEvent {
    /// The wire discriminant of this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "RUN_STARTED",
            Self::RunFinished { .. } => "RUN_FINISHED",
            Self::RunError { .. } => "RUN_ERROR",
            Self::TextMessageStart { .. } => "TEXT_MESSAGE_START",
            Self::TextMessageContent { .. } => "TEXT_MESSAGE_CONTENT",
            Self::TextMessageEnd { .. } => "TEXT_MESSAGE_END",
            Self::ThinkingStart { .. } => "THINKING_START",
            Self::ThinkingEnd => "THINKING_END",
            Self::ThinkingTextMessageStart { .. } => "THINKING_TEXT_MESSAGE_START",
            Self::ThinkingTextMessageContent { .. } => "THINKING_TEXT_MESSAGE_CONTENT",
            Self::ThinkingTextMessageEnd { .. } => "THINKING_TEXT_MESSAGE_END",
            Self::ToolCallStart { .. } => "TOOL_CALL_START",
            Self::ToolCallArgs { .. } => "TOOL_CALL_ARGS",
            Self::ToolCallEnd { .. } => "TOOL_CALL_END",
            Self::ToolCallResult { .. } => "TOOL_CALL_RESULT",
            Self::StateSnapshot { .. } => "STATE_SNAPSHOT",
            Self::MessagesSnapshot { .. } => "MESSAGES_SNAPSHOT",
            Self::Custom { .. } => "CUSTOM",
        }
    }

    /// Build the `PredictState` custom event for a set of mappings.
    pub fn predict_state(mappings: &[PredictStateMapping]) -> Result<Self, serde_json::Error> {
        Ok(Self::Custom {
            name: PREDICT_STATE.to_string(),
            value: serde_json::to_value(mappings)?,
        })
    }

    /// Build a `RUN_ERROR` event with a code.
    pub fn run_error(message: impl Into<String>, code: &str) -> Self {
        Self::RunError {
            message: message.into(),
            code: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
