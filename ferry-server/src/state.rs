//! Application state for the ferry server.

use std::sync::Arc;

use ferry_core::FerryAgent;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The shared agent instance.
    pub agent: Arc<FerryAgent>,
}

impl AppState {
    /// Create new application state from an `Arc<FerryAgent>`.
    pub fn from_arc(agent: Arc<FerryAgent>) -> Self {
        Self { agent }
    }
}
