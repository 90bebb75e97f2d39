//! Translation of runtime events into AG-UI events.
//!
//! [`EventTranslator`] consumes one runtime event at a time and produces the
//! protocol events that event contributes, in order. Across calls it keeps
//! just enough memory to guarantee that:
//!
//! - text and thinking messages are always bracketed by start and end
//! - a final consolidated message never repeats already-streamed content
//! - each tool call is reported once, however many events reference it
//! - long-running (client-side) tool calls are reported only through
//!   [`EventTranslator::translate_lro_function_calls`], and their results
//!   are never reported at all
//! - tool calls on partial (preview) events are never surfaced
//!
//! # Phases
//!
//! | Phase | Input | Output |
//! |-------|-------|--------|
//! | Text | non-thought text parts | `TEXT_MESSAGE_*` |
//! | Thinking | thought text parts | `THINKING_*` |
//! | Function calls | calls on non-partial events | `CUSTOM` PredictState, `TOOL_CALL_START/ARGS/END` |
//! | Function responses | responses | `TOOL_CALL_RESULT` |
//!
//! Every phase runs on every event. A phase with nothing to do emits nothing
//! and never prevents the later phases from running.

mod span;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::TranslateError;
use crate::predict_state::{PredictStateConfig, PredictStateMapping};
use crate::protocol::{AguiEvent, MessageRole};
use crate::runtime::{FunctionCall, RuntimeEvent};

use span::{FramedSpan, TextFrames, ThinkingFrames};

/// Splits a tool call's serialized arguments into `TOOL_CALL_ARGS` chunks.
///
/// Empty chunks are dropped.
pub type ArgsChunker = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Per-tool behavior looked up by tool name.
#[derive(Clone, Default)]
pub struct ToolBehavior {
    /// Predictive state mappings announced before the tool's first call.
    pub predict_state: Vec<PredictStateMapping>,
    /// Custom argument streaming; `None` sends arguments as one chunk.
    pub args_chunker: Option<ArgsChunker>,
}

impl fmt::Debug for ToolBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBehavior")
            .field("predict_state", &self.predict_state)
            .field("args_chunker", &self.args_chunker.is_some())
            .finish()
    }
}

/// Immutable translator configuration, keyed by tool name.
///
/// # Example
///
/// ```rust
/// use ferry_core::{PredictStateMapping, TranslatorConfig};
///
/// let config = TranslatorConfig::new()
///     .with_predict_state(PredictStateMapping::new("document", "write_document", "content"))
///     .with_args_chunker("write_document", |args: &str| {
///         args.as_bytes()
///             .chunks(64)
///             .map(|c| String::from_utf8_lossy(c).into_owned())
///             .collect()
///     });
///
/// assert_eq!(config.predict_state_for("write_document").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranslatorConfig {
    tools: HashMap<String, ToolBehavior>,
}

impl TranslatorConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register predictive state mappings, one or many.
    pub fn with_predict_state(mut self, config: impl Into<PredictStateConfig>) -> Self {
        for (tool, mappings) in config.into().by_tool() {
            self.tools
                .entry(tool)
                .or_default()
                .predict_state
                .extend(mappings);
        }
        self
    }

    /// Stream a tool's arguments through a custom chunker.
    pub fn with_args_chunker<F>(mut self, tool: impl Into<String>, chunker: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.tools.entry(tool.into()).or_default().args_chunker = Some(Arc::new(chunker));
        self
    }

    /// Behavior registered for a tool.
    pub fn behavior(&self, tool: &str) -> Option<&ToolBehavior> {
        self.tools.get(tool)
    }

    /// Predictive state mappings registered for a tool.
    pub fn predict_state_for(&self, tool: &str) -> &[PredictStateMapping] {
        self.behavior(tool)
            .map(|b| b.predict_state.as_slice())
            .unwrap_or(&[])
    }
}

/// Per-run translation state. Cleared by [`EventTranslator::reset`].
#[derive(Debug, Default)]
struct TranslatorState {
    text: FramedSpan<TextFrames>,
    thinking: FramedSpan<ThinkingFrames>,
    seen_tool_call_ids: HashSet<String>,
    predict_state_sent_for_tool: HashSet<String>,
    long_running_tool_ids: HashSet<String>,
}

/// Stateful translator from runtime events to AG-UI events.
///
/// One instance serves one run at a time. Reuse across runs requires a
/// [`reset`](Self::reset) in between, otherwise duplicate detection leaks
/// from one run into the next.
///
/// # Example
///
/// ```rust
/// use ferry_core::{EventTranslator, RuntimeEvent};
///
/// let mut translator = EventTranslator::default();
///
/// let chunk = RuntimeEvent::new().with_text("Hello").partial(true);
/// let events = translator.translate(&chunk, "thread-1", "run-1").unwrap();
/// assert_eq!(events.len(), 2); // start + content
///
/// let closing = translator.force_close_streaming_message();
/// assert_eq!(closing.len(), 1); // end
/// ```
#[derive(Debug, Default)]
pub struct EventTranslator {
    config: TranslatorConfig,
    state: TranslatorState,
}

impl EventTranslator {
    /// Create a translator with the given configuration.
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            config,
            state: TranslatorState::default(),
        }
    }

    /// The translator's configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate one runtime event.
    ///
    /// Long-running calls on the event are remembered and left for
    /// [`translate_lro_function_calls`](Self::translate_lro_function_calls).
    ///
    /// # Errors
    ///
    /// Fails only if tool arguments or a tool response cannot be serialized.
    pub fn translate(
        &mut self,
        event: &RuntimeEvent,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Vec<AguiEvent>, TranslateError> {
        if event.is_user() {
            debug!("skipping user event {} (thread={}, run={})", event.id, thread_id, run_id);
            return Ok(Vec::new());
        }

        self.remember_long_running(event);

        let mut out = Vec::new();
        self.translate_text(event, &mut out);
        self.translate_thinking(event, &mut out);

        if event.is_partial() {
            if event.function_calls().next().is_some() {
                debug!("skipping tool call preview on partial event {}", event.id);
            }
        } else {
            self.translate_function_calls(event, &mut out)?;
        }

        self.translate_function_responses(event, &mut out)?;

        debug!(
            "event {} produced {} protocol events (thread={}, run={})",
            event.id,
            out.len(),
            thread_id,
            run_id
        );
        Ok(out)
    }

    /// Translate the long-running function calls of an event.
    ///
    /// Only calls whose ids are flagged long-running are emitted; every other
    /// call is left to [`translate`](Self::translate). Partial events yield
    /// nothing.
    pub fn translate_lro_function_calls(
        &mut self,
        event: &RuntimeEvent,
    ) -> Result<Vec<AguiEvent>, TranslateError> {
        self.remember_long_running(event);

        let mut out = Vec::new();
        if event.is_partial() {
            return Ok(out);
        }

        for call in event.function_calls() {
            let Some(id) = call.id.as_deref() else {
                continue;
            };
            if !self.state.long_running_tool_ids.contains(id) {
                continue;
            }
            if !self.state.seen_tool_call_ids.insert(id.to_string()) {
                debug!("long-running tool call {} already reported", id);
                continue;
            }
            self.emit_tool_call(call, id.to_string(), &mut out)?;
        }

        Ok(out)
    }

    /// Close the open text message, if any.
    pub fn force_close_streaming_message(&mut self) -> Vec<AguiEvent> {
        let mut out = Vec::new();
        if self.state.text.is_open() {
            debug!("force-closing text message");
        }
        self.state.text.close(&mut out);
        out
    }

    /// Close the open thinking message, if any.
    pub fn force_close_thinking_message(&mut self) -> Vec<AguiEvent> {
        let mut out = Vec::new();
        self.state.thinking.close(&mut out);
        out
    }

    /// Clear all per-run state, keeping the configuration.
    pub fn reset(&mut self) {
        self.state = TranslatorState::default();
    }

    /// True while a text message is open.
    pub fn is_streaming(&self) -> bool {
        self.state.text.is_open()
    }

    /// True while a thinking message is open.
    pub fn is_thinking(&self) -> bool {
        self.state.thinking.is_open()
    }

    /// Id of the open text message.
    pub fn current_message_id(&self) -> Option<&str> {
        self.state.text.message_id()
    }

    /// Id of the open thinking message.
    pub fn current_thinking_message_id(&self) -> Option<&str> {
        self.state.thinking.message_id()
    }

    /// Text streamed into the open text message so far.
    pub fn current_stream_text(&self) -> &str {
        self.state.text.current_text()
    }

    /// Text of the last closed text message, kept for duplicate detection.
    pub fn last_streamed_text(&self) -> &str {
        self.state.text.last_text()
    }

    /// Reasoning text streamed into the open thinking message so far.
    pub fn current_thinking_text(&self) -> &str {
        self.state.thinking.current_text()
    }

    /// Long-running tool call ids seen during this run.
    pub fn long_running_tool_ids(&self) -> &HashSet<String> {
        &self.state.long_running_tool_ids
    }

    /// Register a tool call id as long-running before it is seen.
    pub fn add_long_running_tool_id(&mut self, id: impl Into<String>) {
        self.state.long_running_tool_ids.insert(id.into());
    }

    fn remember_long_running(&mut self, event: &RuntimeEvent) {
        self.state
            .long_running_tool_ids
            .extend(event.long_running_tool_ids.iter().cloned());
    }

    fn translate_text(&mut self, event: &RuntimeEvent, out: &mut Vec<AguiEvent>) {
        let Some(text) = event.answer_text() else {
            return;
        };
        let span = &mut self.state.text;

        if event.is_final_response() {
            span.finish(&text, out);
            return;
        }

        span.push(&text, out);
        if event.ends_turn() {
            span.close(out);
        }
    }

    fn translate_thinking(&mut self, event: &RuntimeEvent, out: &mut Vec<AguiEvent>) {
        let Some(text) = event.thought_text() else {
            return;
        };
        let span = &mut self.state.thinking;

        if event.is_final_response() {
            span.finish(&text, out);
            return;
        }

        span.push(&text, out);
        if event.ends_turn() {
            span.close(out);
        }
    }

    fn translate_function_calls(
        &mut self,
        event: &RuntimeEvent,
        out: &mut Vec<AguiEvent>,
    ) -> Result<(), TranslateError> {
        for call in event.function_calls() {
            let id = call
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            if self.state.long_running_tool_ids.contains(&id) {
                debug!("tool call {} is long-running, deferring", id);
                continue;
            }
            if !self.state.seen_tool_call_ids.insert(id.clone()) {
                debug!("tool call {} already reported", id);
                continue;
            }
            self.emit_tool_call(call, id, out)?;
        }
        Ok(())
    }

    fn emit_tool_call(
        &mut self,
        call: &FunctionCall,
        tool_call_id: String,
        out: &mut Vec<AguiEvent>,
    ) -> Result<(), TranslateError> {
        let behavior = self.config.tools.get(&call.name);

        if let Some(behavior) = behavior {
            if !behavior.predict_state.is_empty()
                && self
                    .state
                    .predict_state_sent_for_tool
                    .insert(call.name.clone())
            {
                let event = AguiEvent::predict_state(&behavior.predict_state).map_err(|source| {
                    TranslateError::PredictState {
                        tool: call.name.clone(),
                        source,
                    }
                })?;
                out.push(event);
            }
        }

        let args =
            serde_json::to_string(&call.args).map_err(|source| TranslateError::Arguments {
                tool: call.name.clone(),
                source,
            })?;

        out.push(AguiEvent::ToolCallStart {
            tool_call_id: tool_call_id.clone(),
            tool_call_name: call.name.clone(),
            parent_message_id: self.state.text.message_id().map(str::to_string),
        });

        let chunks: Vec<String> = match behavior.and_then(|b| b.args_chunker.as_ref()) {
            Some(chunker) => chunker(&args)
                .into_iter()
                .filter(|d| !d.is_empty())
                .collect(),
            None => Vec::new(),
        };

        // A chunker that yields nothing still owes the client the arguments.
        if chunks.is_empty() {
            out.push(AguiEvent::ToolCallArgs {
                tool_call_id: tool_call_id.clone(),
                delta: args,
            });
        }
        for delta in chunks {
            out.push(AguiEvent::ToolCallArgs {
                tool_call_id: tool_call_id.clone(),
                delta,
            });
        }

        out.push(AguiEvent::ToolCallEnd { tool_call_id });
        Ok(())
    }

    fn translate_function_responses(
        &mut self,
        event: &RuntimeEvent,
        out: &mut Vec<AguiEvent>,
    ) -> Result<(), TranslateError> {
        for response in event.function_responses() {
            let Some(tool_call_id) = response.id.as_deref() else {
                warn!("function response without an id on event {}, skipping", event.id);
                continue;
            };
            if self.state.long_running_tool_ids.contains(tool_call_id) {
                debug!("result of long-running tool call {} belongs to the client", tool_call_id);
                continue;
            }

            let content = serde_json::to_string(&response.response).map_err(|source| {
                TranslateError::Response {
                    tool_call_id: tool_call_id.to_string(),
                    source,
                }
            })?;

            out.push(AguiEvent::ToolCallResult {
                message_id: uuid::Uuid::new_v4().to_string(),
                tool_call_id: tool_call_id.to_string(),
                content,
                role: Some(MessageRole::Tool),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "translator_tests.rs"]
mod tests;
