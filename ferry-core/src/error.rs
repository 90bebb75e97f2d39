//! Error types for ferry-core
//!
//! The translator itself never fails on malformed input; the only way it can
//! fail is when a tool payload refuses to serialize. Runtime failures come
//! from the upstream agent runtime and are carried through unchanged.

use thiserror::Error;

use crate::protocol::{AGENT_ERROR, ENCODING_ERROR};

/// Errors raised while translating runtime events into protocol events.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Tool call arguments could not be serialized to JSON.
    #[error("failed to serialize arguments for tool '{tool}': {source}")]
    Arguments {
        /// Name of the tool whose arguments failed
        tool: String,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Predictive state mappings could not be serialized to JSON.
    #[error("failed to serialize predictive state for tool '{tool}': {source}")]
    PredictState {
        /// Tool the mappings belong to
        tool: String,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// A tool response payload could not be serialized to JSON.
    #[error("failed to serialize response for tool call '{tool_call_id}': {source}")]
    Response {
        /// Id of the originating tool call
        tool_call_id: String,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reported by an upstream agent runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime could not start the run.
    #[error("runtime failed to start: {0}")]
    Start(String),

    /// The runtime's event stream failed mid-run.
    #[error("runtime stream failed: {0}")]
    Stream(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Top-level error type for a ferry run
///
/// Each variant maps onto exactly one protocol error code, see [`Error::code`].
#[derive(Debug, Error)]
pub enum Error {
    /// The agent runtime failed
    #[error("Agent execution failed: {0}")]
    Runtime(#[from] RuntimeError),

    /// An event could not be translated or encoded
    #[error("Event encoding failed: {0}")]
    Translate(#[from] TranslateError),
}

impl Error {
    /// Returns the `RUN_ERROR` code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Runtime(_) => AGENT_ERROR,
            Self::Translate(_) => ENCODING_ERROR,
        }
    }

    /// Returns true if the runtime failed
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }
}

/// Result type alias for ferry operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
