//! HTTP server for ferry agents.
//!
//! Exposes a [`FerryAgent`](ferry_core::FerryAgent) as an AG-UI endpoint: each
//! POST starts a run and streams the translated events back as server-sent
//! events.
//!
//! # Features
//!
//! - `agui` - AG-UI SSE endpoint (enabled by default)
//!
//! # Example
//!
//! ```rust,no_run
//! use ferry_server::FerryRouter;
//! use ferry_core::FerryAgent;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let agent: FerryAgent = todo!();
//! let app = FerryRouter::new(agent)
//!     .with_agui("/api/agui")
//!     .permissive_cors()
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod router;
pub(crate) mod state;

#[cfg(feature = "agui")]
pub mod agui;

pub use error::{BuildError, ServerError, ServerResult};
pub use router::FerryRouter;

#[cfg(feature = "agui")]
pub use agui::handler::AgentRequest;
