//! HTTP handlers for AG-UI protocol endpoints.

use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use ferry_core::{AguiEvent, Message, RunInput, ENCODING_ERROR};
use futures::stream::{Stream, StreamExt};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::ServerError;
use crate::state::AppState;

/// Events buffered between the run task and the SSE response.
const EVENT_BUFFER: usize = 100;

/// Payload of the frame sent when even the error event cannot be encoded.
pub(crate) const ENCODING_FAILED_PAYLOAD: &str = r#"{"error": "Event encoding failed"}"#;

/// Request body for running an agent.
///
/// Missing ids are generated server-side.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// Thread ID for conversation continuity.
    #[serde(default, alias = "thread_id")]
    pub thread_id: Option<String>,
    /// Run ID for this specific run.
    #[serde(default, alias = "run_id")]
    pub run_id: Option<String>,
    /// Conversation so far.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Application state shared with the frontend.
    #[serde(default)]
    pub state: Value,
}

impl AgentRequest {
    /// Resolve into a run input, generating missing ids.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidRequest`] if an id is present but blank.
    pub fn into_run_input(self) -> Result<RunInput, ServerError> {
        Ok(RunInput {
            thread_id: resolve_id("threadId", self.thread_id)?,
            run_id: resolve_id("runId", self.run_id)?,
            messages: self.messages,
            state: self.state,
        })
    }
}

fn resolve_id(field: &str, id: Option<String>) -> Result<String, ServerError> {
    match id {
        Some(id) if id.trim().is_empty() => Err(ServerError::InvalidRequest(format!(
            "{} must not be empty",
            field
        ))),
        Some(id) => Ok(id),
        None => Ok(uuid::Uuid::new_v4().to_string()),
    }
}

/// Handle AG-UI protocol requests.
///
/// Accepts POST with an [`AgentRequest`] body, returns an SSE stream of AG-UI
/// events. The run is driven on its own task and stops when the client goes
/// away.
pub async fn agui_handler(
    State(state): State<AppState>,
    request: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let Json(request) = request?;
    let input = request.into_run_input()?;
    let run_id = input.run_id.clone();
    debug!("starting run {} on thread {}", input.run_id, input.thread_id);

    let events = state.agent.run(input);
    let (tx, rx) = mpsc::channel::<AguiEvent>(EVENT_BUFFER);

    tokio::spawn(forward(events, tx, run_id));

    let stream =
        ReceiverStream::new(rx).map(|event| Ok::<Event, Infallible>(encode_event(&event).into()));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Pump run events into the response channel until the run ends or the
/// receiving side is dropped, whichever happens first.
pub(crate) async fn forward<S>(mut events: S, tx: mpsc::Sender<AguiEvent>, run_id: String)
where
    S: Stream<Item = AguiEvent> + Unpin,
{
    loop {
        tokio::select! {
            _ = tx.closed() => break,
            event = events.next() => {
                let Some(event) = event else { return };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
    }
    debug!("client disconnected, abandoning run {}", run_id);
}

/// An encoded SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A serialized event on a plain `data:` line.
    Data(String),
    /// Last-resort `error` frame.
    Error(&'static str),
}

impl From<Frame> for Event {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Data(json) => Event::default().data(json),
            Frame::Error(payload) => Event::default().event("error").data(payload),
        }
    }
}

/// Encode an event, degrading to a `RUN_ERROR` and then to a raw error frame.
pub(crate) fn encode_event<T: Serialize>(event: &T) -> Frame {
    match serde_json::to_string(event) {
        Ok(json) => Frame::Data(json),
        Err(e) => {
            error!("failed to encode event: {}", e);
            encode_fallback(&AguiEvent::run_error(
                format!("Event encoding failed: {}", e),
                ENCODING_ERROR,
            ))
        }
    }
}

pub(crate) fn encode_fallback<T: Serialize>(fallback: &T) -> Frame {
    match serde_json::to_string(fallback) {
        Ok(json) => Frame::Data(json),
        Err(e) => {
            error!("failed to encode error event: {}", e);
            Frame::Error(ENCODING_FAILED_PAYLOAD)
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
