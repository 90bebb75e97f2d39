//! Driving an agent runtime through the translator.
//!
//! [`FerryAgent`] owns the run lifecycle around [`EventTranslator`]: it
//! brackets the run with `RUN_STARTED`/`RUN_FINISHED`, routes long-running
//! tool calls, flushes spans left open when the runtime stops, and converts
//! failures into a single terminating `RUN_ERROR`.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, RuntimeError, TranslateError};
use crate::messages::{events_to_messages, Message};
use crate::protocol::AguiEvent;
use crate::runtime::RuntimeEvent;
use crate::translator::{EventTranslator, TranslatorConfig};

/// Stream of events produced by one runtime run.
pub type RuntimeEventStream =
    Pin<Box<dyn Stream<Item = std::result::Result<RuntimeEvent, RuntimeError>> + Send>>;

/// Stream of protocol events produced by [`FerryAgent::run`].
pub type AguiEventStream = Pin<Box<dyn Stream<Item = AguiEvent> + Send>>;

/// An upstream agent runtime.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Start a run and return its event stream.
    async fn run(&self, input: &RunInput) -> std::result::Result<RuntimeEventStream, RuntimeError>;
}

/// Input for a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInput {
    /// Thread ID for conversation continuity.
    pub thread_id: String,
    /// Unique run ID for this execution.
    pub run_id: String,
    /// Conversation so far.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Application state shared with the frontend.
    #[serde(default)]
    pub state: Value,
}

impl RunInput {
    /// Create an input with no history.
    pub fn new(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            ..Self::default()
        }
    }

    /// Append a message to the history.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Runs an [`AgentRuntime`] and yields AG-UI events.
///
/// Each run gets its own translator, so concurrent runs on one agent never
/// share framing or dedup state.
#[derive(Clone)]
pub struct FerryAgent {
    runtime: Arc<dyn AgentRuntime>,
    config: TranslatorConfig,
    emit_messages_snapshot: bool,
}

/// Builder for [`FerryAgent`].
pub struct FerryAgentBuilder {
    runtime: Arc<dyn AgentRuntime>,
    config: TranslatorConfig,
    emit_messages_snapshot: bool,
}

impl FerryAgentBuilder {
    /// Use this translator configuration for every run.
    pub fn with_translator_config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Emit a `MESSAGES_SNAPSHOT` before `RUN_FINISHED`.
    pub fn emit_messages_snapshot(mut self, enabled: bool) -> Self {
        self.emit_messages_snapshot = enabled;
        self
    }

    /// Build the agent.
    pub fn build(self) -> FerryAgent {
        FerryAgent {
            runtime: self.runtime,
            config: self.config,
            emit_messages_snapshot: self.emit_messages_snapshot,
        }
    }
}

impl FerryAgent {
    /// Start building an agent around a runtime.
    pub fn builder(runtime: impl AgentRuntime + 'static) -> FerryAgentBuilder {
        Self::builder_from_arc(Arc::new(runtime))
    }

    /// Start building an agent around a shared runtime.
    pub fn builder_from_arc(runtime: Arc<dyn AgentRuntime>) -> FerryAgentBuilder {
        FerryAgentBuilder {
            runtime,
            config: TranslatorConfig::default(),
            emit_messages_snapshot: false,
        }
    }

    /// The translator configuration used for each run.
    pub fn translator_config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Run the runtime and stream the translated events.
    ///
    /// The stream always starts with `RUN_STARTED` and ends with either
    /// `RUN_FINISHED` or a single `RUN_ERROR`. Open text and thinking
    /// messages are closed before either.
    pub fn run(&self, input: RunInput) -> AguiEventStream {
        let runtime = self.runtime.clone();
        let mut translator = EventTranslator::new(self.config.clone());
        let emit_snapshot = self.emit_messages_snapshot;

        Box::pin(stream! {
            yield AguiEvent::RunStarted {
                thread_id: input.thread_id.clone(),
                run_id: input.run_id.clone(),
            };

            let mut events = match runtime.run(&input).await {
                Ok(events) => events,
                Err(e) => {
                    for event in abort(&mut translator, e.into()) {
                        yield event;
                    }
                    return;
                }
            };

            let mut history = Vec::new();
            while let Some(item) = events.next().await {
                let event = match item {
                    Ok(event) => event,
                    Err(e) => {
                        for event in abort(&mut translator, e.into()) {
                            yield event;
                        }
                        return;
                    }
                };

                match translate_step(&mut translator, &event, &input) {
                    Ok(out) => {
                        for agui_event in out {
                            yield agui_event;
                        }
                    }
                    Err(e) => {
                        for event in abort(&mut translator, e.into()) {
                            yield event;
                        }
                        return;
                    }
                }

                if emit_snapshot {
                    history.push(event);
                }
            }

            for event in close_spans(&mut translator) {
                yield event;
            }

            if emit_snapshot {
                match snapshot(&input, &history) {
                    Ok(event) => yield event,
                    Err(e) => {
                        for event in abort(&mut translator, e.into()) {
                            yield event;
                        }
                        return;
                    }
                }
            }

            debug!("run {} finished", input.run_id);
            yield AguiEvent::RunFinished {
                thread_id: input.thread_id.clone(),
                run_id: input.run_id.clone(),
            };
        })
    }
}

/// Translate one runtime event, then its long-running calls.
fn translate_step(
    translator: &mut EventTranslator,
    event: &RuntimeEvent,
    input: &RunInput,
) -> std::result::Result<Vec<AguiEvent>, TranslateError> {
    let mut out = translator.translate(event, &input.thread_id, &input.run_id)?;
    if !event.long_running_tool_ids.is_empty() && !event.is_partial() {
        out.extend(translator.translate_lro_function_calls(event)?);
    }
    Ok(out)
}

fn close_spans(translator: &mut EventTranslator) -> Vec<AguiEvent> {
    let mut out = translator.force_close_thinking_message();
    out.extend(translator.force_close_streaming_message());
    out
}

fn abort(translator: &mut EventTranslator, error: Error) -> Vec<AguiEvent> {
    error!("run aborted: {}", error);
    let mut out = close_spans(translator);
    out.push(AguiEvent::run_error(error.to_string(), error.code()));
    out
}

fn snapshot(
    input: &RunInput,
    history: &[RuntimeEvent],
) -> std::result::Result<AguiEvent, TranslateError> {
    let mut messages = input.messages.clone();
    messages.extend(events_to_messages(history)?);
    Ok(AguiEvent::MessagesSnapshot { messages })
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
