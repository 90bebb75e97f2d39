//! AG-UI protocol endpoint.
//!
//! AG-UI (Agent-User Interaction) is an open, event-based protocol that
//! standardizes how AI agents connect to user-facing applications. Events are
//! streamed to the frontend as server-sent events, one JSON object per `data:`
//! line.
//!
//! The translation from runtime events to AG-UI events lives in
//! [`ferry_core`]; this module only carries the resulting stream over HTTP.

pub mod handler;
