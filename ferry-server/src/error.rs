//! Error types for the ferry server.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors that can occur when building a router.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No endpoints were configured.
    #[error("No endpoints configured. Call .with_agui() before .build()")]
    NoEndpoints,
}

/// Errors returned to HTTP clients before a run starts.
///
/// Once the SSE stream is open, failures travel in-band as `RUN_ERROR`
/// events instead.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request body could not be parsed.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// Invalid request from client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Body(rejection) => rejection.status(),
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Body(rejection) => rejection.body_text(),
            ServerError::InvalidRequest(e) => e.clone(),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
