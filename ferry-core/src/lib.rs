//! # Ferry
//!
//! Translate the event stream of an agent runtime into the AG-UI protocol.
//!
//! Agent runtimes emit coarse, provider-shaped events: partial text chunks,
//! consolidated final responses, thoughts, function calls and function
//! responses. AG-UI frontends expect a strictly framed stream where every
//! message has a start, content and an end, and every tool call is announced
//! before its arguments. [`EventTranslator`] bridges the two, one runtime
//! event at a time.
//!
//! ## Quick Start
//!
//! ```rust
//! use ferry_core::{EventTranslator, RuntimeEvent};
//!
//! let mut translator = EventTranslator::default();
//!
//! let mut out = Vec::new();
//! for event in [
//!     RuntimeEvent::new().with_text("Hel").partial(true),
//!     RuntimeEvent::new().with_text("lo").partial(true),
//!     RuntimeEvent::new().with_text("Hello").final_response(),
//! ] {
//!     out.extend(translator.translate(&event, "thread-1", "run-1").unwrap());
//! }
//! out.extend(translator.force_close_streaming_message());
//!
//! let types: Vec<_> = out.iter().map(|e| e.event_type()).collect();
//! assert_eq!(
//!     types,
//!     ["TEXT_MESSAGE_START", "TEXT_MESSAGE_CONTENT", "TEXT_MESSAGE_CONTENT", "TEXT_MESSAGE_END"]
//! );
//! ```
//!
//! ## Running an agent
//!
//! [`FerryAgent`] wraps an [`AgentRuntime`] and produces a complete run:
//!
//! ```ignore
//! use ferry_core::{FerryAgent, RunInput};
//! use futures::StreamExt;
//!
//! let agent = FerryAgent::builder(my_runtime)
//!     .emit_messages_snapshot(true)
//!     .build();
//!
//! let mut events = agent.run(RunInput::new("thread-1", "run-1"));
//! while let Some(event) = events.next().await {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! ```
//!
//! ## Features
//!
//! - **Message framing**: text and thinking spans are opened, streamed and closed exactly once
//! - **Final-response dedup**: consolidated finals never repeat streamed text
//! - **Tool calls**: START/ARGS/END triplets, with optional argument chunking
//! - **Long-running tools**: calls the client resolves are held back and never answered twice
//! - **Predictive state**: `PredictState` hints sent ahead of state-editing tools

pub mod agent;
pub mod error;
pub mod messages;
pub mod predict_state;
pub mod protocol;
pub mod runtime;
pub mod translator;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use agent::{
    AgentRuntime, AguiEventStream, FerryAgent, FerryAgentBuilder, RunInput, RuntimeEventStream,
};
pub use error::{Error, Result, RuntimeError, TranslateError};
pub use messages::{events_to_messages, function_calls_to_tool_calls, Message, ToolCall};
pub use predict_state::{PredictStateConfig, PredictStateMapping};
pub use protocol::{AguiEvent, MessageRole, AGENT_ERROR, ENCODING_ERROR, PREDICT_STATE};
pub use runtime::{Content, FunctionCall, FunctionResponse, Part, RuntimeEvent, USER_AUTHOR};
pub use translator::{ArgsChunker, EventTranslator, ToolBehavior, TranslatorConfig};
