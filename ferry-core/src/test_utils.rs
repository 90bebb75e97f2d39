//! Test utilities for ferry-core.
//!
//! This module provides a scripted runtime so agents and servers can be
//! exercised without a real model behind them.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! ferry-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ferry_core::test_utils::{collect_events, event_types, MockRuntime};
//! use ferry_core::{FerryAgent, RunInput, RuntimeEvent};
//!
//! # async fn example() {
//! let runtime = MockRuntime::new()
//!     .with_event(RuntimeEvent::new().with_text("Hello").final_response());
//!
//! let agent = FerryAgent::builder(runtime).build();
//! let events = collect_events(agent.run(RunInput::new("t-1", "r-1"))).await;
//!
//! assert_eq!(event_types(&events).first(), Some(&"RUN_STARTED"));
//! # }
//! ```

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;

use crate::agent::{AgentRuntime, AguiEventStream, RunInput, RuntimeEventStream};
use crate::error::RuntimeError;
use crate::protocol::AguiEvent;
use crate::runtime::RuntimeEvent;

/// A runtime that replays a fixed script of events on every run.
///
/// # Example
///
/// ```ignore
/// use ferry_core::test_utils::MockRuntime;
/// use ferry_core::{FunctionCall, RuntimeEvent};
/// use serde_json::json;
///
/// let runtime = MockRuntime::new()
///     .with_event(RuntimeEvent::new().with_text("Checking").partial(true))
///     .with_event(
///         RuntimeEvent::new()
///             .with_function_call(FunctionCall::new("fc-1", "search", json!({"q": "rust"}))),
///     );
/// ```
#[derive(Clone, Default)]
pub struct MockRuntime {
    script: Arc<Mutex<Vec<Result<RuntimeEvent, RuntimeError>>>>,
    start_error: Option<RuntimeError>,
    inputs: Arc<Mutex<Vec<RunInput>>>,
}

impl MockRuntime {
    /// Create a runtime with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runtime whose runs fail before producing any event.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            start_error: Some(RuntimeError::Start(message.into())),
            ..Self::default()
        }
    }

    /// Append an event to the script.
    pub fn with_event(self, event: RuntimeEvent) -> Self {
        self.script.lock().push(Ok(event));
        self
    }

    /// Append several events to the script.
    pub fn with_events(self, events: impl IntoIterator<Item = RuntimeEvent>) -> Self {
        self.script.lock().extend(events.into_iter().map(Ok));
        self
    }

    /// Append a mid-stream failure to the script.
    pub fn with_stream_error(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .push(Err(RuntimeError::Stream(message.into())));
        self
    }

    /// Inputs of every run started so far.
    pub fn runs(&self) -> Vec<RunInput> {
        self.inputs.lock().clone()
    }

    /// Number of runs started so far.
    pub fn run_count(&self) -> usize {
        self.inputs.lock().len()
    }
}

#[async_trait::async_trait]
impl AgentRuntime for MockRuntime {
    async fn run(&self, input: &RunInput) -> Result<RuntimeEventStream, RuntimeError> {
        self.inputs.lock().push(input.clone());

        if let Some(err) = &self.start_error {
            return Err(err.clone());
        }

        let script = self.script.lock().clone();
        Ok(Box::pin(futures::stream::iter(script)))
    }
}

/// Drain an agent stream into a vector.
pub async fn collect_events(stream: AguiEventStream) -> Vec<AguiEvent> {
    stream.collect().await
}

/// Wire type names of a sequence of events.
pub fn event_types(events: &[AguiEvent]) -> Vec<&'static str> {
    events.iter().map(AguiEvent::event_type).collect()
}
