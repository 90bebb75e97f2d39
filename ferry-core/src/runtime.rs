//! Events produced by an upstream agent runtime.
//!
//! Providers disagree about how they fill these fields in. Gemini-style
//! producers stream deltas and close with `turn_complete`; Claude-style
//! producers keep `partial` set on every chunk and close only through a final
//! consolidated event that repeats the whole text. Every flag is therefore
//! modelled as optional and resolved to a documented default by the accessor
//! that reads it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author name the runtime uses for end-user input.
pub const USER_AUTHOR: &str = "user";

/// One event emitted by an agent runtime.
///
/// Deserialization never rejects a missing field: absent values fall back to
/// their defaults so a malformed event degrades instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeEvent {
    /// Event id assigned by the runtime.
    pub id: String,
    /// Producer of the event. `None` means the assistant.
    pub author: Option<String>,
    /// Streaming preview subject to later revision. Absent means `false`.
    pub partial: Option<bool>,
    /// The producer's logical turn ended. Absent means `false`.
    pub turn_complete: Option<bool>,
    /// Authoritative last event of the turn.
    pub final_response: bool,
    /// Terminal signal that ends streaming on its own.
    pub finish_reason: Option<String>,
    /// Content parts carried by the event.
    pub content: Option<Content>,
    /// Function call ids on this event that the client executes.
    pub long_running_tool_ids: Vec<String>,
}

/// Ordered content parts of a runtime event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// The parts, in producer order.
    pub parts: Vec<Part>,
}

/// A single content part.
///
/// In practice a part carries exactly one of text, a function call or a
/// function response, but nothing here relies on that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Part {
    /// Text payload.
    pub text: Option<String>,
    /// Marks the text as reasoning rather than answer content.
    pub thought: Option<bool>,
    /// Function call payload.
    pub function_call: Option<FunctionCall>,
    /// Function response payload.
    pub function_response: Option<FunctionResponse>,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Call id. Some producers omit it; the translator generates one then.
    #[serde(default)]
    pub id: Option<String>,
    /// Tool name.
    pub name: String,
    /// Call arguments.
    #[serde(default = "empty_args")]
    pub args: Value,
}

/// The result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Id of the originating call.
    #[serde(default)]
    pub id: Option<String>,
    /// Tool name, when the producer includes it.
    #[serde(default)]
    pub name: Option<String>,
    /// Response payload.
    #[serde(default)]
    pub response: Value,
}

fn empty_args() -> Value {
    Value::Object(Map::new())
}

impl RuntimeEvent {
    /// Create an empty assistant event with a fresh id.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the `partial` flag.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }

    /// Set the `turn_complete` flag.
    pub fn turn_complete(mut self, turn_complete: bool) -> Self {
        self.turn_complete = Some(turn_complete);
        self
    }

    /// Mark this event as the final response of the turn.
    pub fn final_response(mut self) -> Self {
        self.final_response = true;
        self
    }

    /// Set the finish reason.
    pub fn finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }

    /// Flag a function call id as long-running.
    pub fn long_running(mut self, id: impl Into<String>) -> Self {
        self.long_running_tool_ids.push(id.into());
        self
    }

    /// Append a text part.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_part(Part {
            text: Some(text.into()),
            ..Part::default()
        })
    }

    /// Append a reasoning part.
    pub fn with_thought(self, text: impl Into<String>) -> Self {
        self.with_part(Part {
            text: Some(text.into()),
            thought: Some(true),
            ..Part::default()
        })
    }

    /// Append a function call part.
    pub fn with_function_call(self, call: FunctionCall) -> Self {
        self.with_part(Part {
            function_call: Some(call),
            ..Part::default()
        })
    }

    /// Append a function response part.
    pub fn with_function_response(self, response: FunctionResponse) -> Self {
        self.with_part(Part {
            function_response: Some(response),
            ..Part::default()
        })
    }

    /// Append an arbitrary part.
    pub fn with_part(mut self, part: Part) -> Self {
        self.content
            .get_or_insert_with(Content::default)
            .parts
            .push(part);
        self
    }

    /// `partial`, with absent treated as `false`.
    pub fn is_partial(&self) -> bool {
        self.partial.unwrap_or(false)
    }

    /// `turn_complete`, with absent treated as `false`.
    pub fn is_turn_complete(&self) -> bool {
        self.turn_complete.unwrap_or(false)
    }

    /// True when a non-empty finish reason is present.
    pub fn has_finish_reason(&self) -> bool {
        self.finish_reason.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// True when the event ends the current turn's streaming.
    pub fn ends_turn(&self) -> bool {
        self.is_turn_complete() || self.has_finish_reason()
    }

    /// True only for events authored by the end user.
    pub fn is_user(&self) -> bool {
        self.author.as_deref() == Some(USER_AUTHOR)
    }

    /// True on the authoritative last event of a turn.
    pub fn is_final_response(&self) -> bool {
        self.final_response
    }

    /// Content parts, empty when the event has no content.
    pub fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Function calls carried by this event, in part order.
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.parts().iter().filter_map(|p| p.function_call.as_ref())
    }

    /// Function responses carried by this event, in part order.
    pub fn function_responses(&self) -> impl Iterator<Item = &FunctionResponse> {
        self.parts().iter().filter_map(|p| p.function_response.as_ref())
    }

    /// Concatenated non-empty answer text, or `None` if there is none.
    ///
    /// Whitespace-only text counts as content.
    pub fn answer_text(&self) -> Option<String> {
        collect_text(self.parts(), false)
    }

    /// Concatenated non-empty reasoning text, or `None` if there is none.
    pub fn thought_text(&self) -> Option<String> {
        collect_text(self.parts(), true)
    }
}

impl Part {
    /// True if this part carries reasoning text.
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

impl FunctionCall {
    /// Create a call with an explicit id.
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            args,
        }
    }
}

impl FunctionResponse {
    /// Create a response for the call with the given id.
    pub fn new(id: impl Into<String>, response: Value) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
            response,
        }
    }
}

fn collect_text(parts: &[Part], thought: bool) -> Option<String> {
    let text: String = parts
        .iter()
        .filter(|p| p.is_thought() == thought)
        .filter_map(|p| p.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect();

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
