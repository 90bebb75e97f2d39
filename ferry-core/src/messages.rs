//! Conversation history in AG-UI message form.
//!
//! Used to build `MESSAGES_SNAPSHOT` events from the runtime events recorded
//! during a run.

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::runtime::{FunctionCall, RuntimeEvent};

/// A conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "role",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum Message {
    /// End-user input.
    User {
        /// Message id.
        id: String,
        /// Message text.
        content: String,
    },

    /// Assistant output: text, tool calls, or both.
    Assistant {
        /// Message id.
        id: String,
        /// Message text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Tool calls requested in this message.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    /// Result of a tool call.
    Tool {
        /// Message id.
        id: String,
        /// Serialized result.
        content: String,
        /// Id of the call this answers.
        tool_call_id: String,
    },

    /// System instruction.
    System {
        /// Message id.
        id: String,
        /// Message text.
        content: String,
    },
}

/// A tool call recorded on an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id.
    pub id: String,
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The invoked function.
    pub function: FunctionInvocation,
}

/// Name and serialized arguments of an invoked function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInvocation {
    /// Function name.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

impl Message {
    /// Message id.
    pub fn id(&self) -> &str {
        match self {
            Self::User { id, .. }
            | Self::Assistant { id, .. }
            | Self::Tool { id, .. }
            | Self::System { id, .. } => id,
        }
    }

    /// Create a user message with a fresh id.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
        }
    }
}

/// Convert function calls to tool calls, generating ids where missing.
pub fn function_calls_to_tool_calls<'a>(
    calls: impl IntoIterator<Item = &'a FunctionCall>,
) -> Result<Vec<ToolCall>, TranslateError> {
    calls
        .into_iter()
        .map(|call| {
            let arguments =
                serde_json::to_string(&call.args).map_err(|source| TranslateError::Arguments {
                    tool: call.name.clone(),
                    source,
                })?;
            Ok(ToolCall {
                id: call
                    .id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                kind: "function".to_string(),
                function: FunctionInvocation {
                    name: call.name.clone(),
                    arguments,
                },
            })
        })
        .collect()
}

/// Convert recorded runtime events into conversation messages.
///
/// Partial events are previews and are skipped. Each remaining event yields
/// at most one user or assistant message, followed by one tool message per
/// function response.
pub fn events_to_messages(events: &[RuntimeEvent]) -> Result<Vec<Message>, TranslateError> {
    let mut messages = Vec::new();

    for event in events.iter().filter(|e| !e.is_partial()) {
        let text = event.answer_text();

        if event.is_user() {
            if let Some(content) = text {
                messages.push(Message::User {
                    id: event.id.clone(),
                    content,
                });
            }
        } else {
            let tool_calls = function_calls_to_tool_calls(event.function_calls())?;
            if text.is_some() || !tool_calls.is_empty() {
                messages.push(Message::Assistant {
                    id: event.id.clone(),
                    content: text,
                    tool_calls,
                });
            }
        }

        for response in event.function_responses() {
            let Some(tool_call_id) = response.id.clone() else {
                continue;
            };
            let content = serde_json::to_string(&response.response).map_err(|source| {
                TranslateError::Response {
                    tool_call_id: tool_call_id.clone(),
                    source,
                }
            })?;
            messages.push(Message::Tool {
                id: uuid::Uuid::new_v4().to_string(),
                content,
                tool_call_id,
            });
        }
    }

    Ok(messages)
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
