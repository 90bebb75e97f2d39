//! Router builder for ferry HTTP endpoints.

use std::sync::Arc;

use axum::Router;
use ferry_core::FerryAgent;
use tower_http::cors::CorsLayer;

use crate::error::BuildError;
use crate::state::AppState;

/// Builder for configuring ferry HTTP endpoints.
///
/// # Example
///
/// ```rust,no_run
/// use ferry_server::FerryRouter;
/// use ferry_core::FerryAgent;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let agent: FerryAgent = todo!();
/// let app = FerryRouter::new(agent)
///     .with_agui("/api/agui")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FerryRouter {
    agent: Arc<FerryAgent>,
    #[cfg(feature = "agui")]
    agui_path: Option<String>,
    cors: Option<CorsLayer>,
}

impl FerryRouter {
    /// Create a new router builder with the given agent.
    pub fn new(agent: FerryAgent) -> Self {
        Self::from_arc(Arc::new(agent))
    }

    /// Create a new router builder from an existing `Arc<FerryAgent>`.
    ///
    /// Use this when you need to share the agent with other parts of your application.
    pub fn from_arc(agent: Arc<FerryAgent>) -> Self {
        Self {
            agent,
            #[cfg(feature = "agui")]
            agui_path: None,
            cors: None,
        }
    }

    /// Enable the AG-UI SSE endpoint at the specified path.
    #[cfg(feature = "agui")]
    pub fn with_agui(mut self, path: impl Into<String>) -> Self {
        self.agui_path = Some(path.into());
        self
    }

    /// Apply a CORS layer to every endpoint.
    pub fn with_cors(mut self, cors: CorsLayer) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Allow cross-origin requests from any origin.
    ///
    /// Browser frontends served from a different origin need this during
    /// development.
    pub fn permissive_cors(self) -> Self {
        self.with_cors(CorsLayer::permissive())
    }

    /// Build the router with all configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoEndpoints`] if no endpoints were configured.
    /// Call `.with_agui()` before `.build()`.
    pub fn build(self) -> Result<Router, BuildError> {
        #[cfg(feature = "agui")]
        let has_endpoints = self.agui_path.is_some();
        #[cfg(not(feature = "agui"))]
        let has_endpoints = false;

        if !has_endpoints {
            return Err(BuildError::NoEndpoints);
        }

        let state = AppState::from_arc(self.agent);
        let mut router = Router::new();

        #[cfg(feature = "agui")]
        if let Some(agui_path) = self.agui_path {
            use crate::agui::handler::agui_handler;
            use axum::routing::post;

            router = router.route(&agui_path, post(agui_handler));
        }

        let mut router = router.with_state(state);
        if let Some(cors) = self.cors {
            router = router.layer(cors);
        }
        Ok(router)
    }

    /// Build the router and nest it under a prefix path.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoEndpoints`] if no endpoints were configured.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use ferry_server::FerryRouter;
    /// # use ferry_core::FerryAgent;
    /// # use axum::Router;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let agent: FerryAgent = todo!();
    /// let ferry = FerryRouter::new(agent)
    ///     .with_agui("/stream")  // Will be at /agent/stream
    ///     .build_nested("/agent")?;
    ///
    /// let app = Router::new().merge(ferry);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build_nested(self, prefix: impl Into<String>) -> Result<Router, BuildError> {
        Ok(Router::new().nest(&prefix.into(), self.build()?))
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
