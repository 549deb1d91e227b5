//! Server error types with HTTP status code mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Fallback message used when a response body cannot be serialized.
const FALLBACK_MESSAGE: &str = "Internal server error";

/// Server error type covering the auth, federation, and storage paths.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Protected endpoint hit without an authenticated session (403)
    #[error("{0}")]
    Forbidden(String),

    /// Route miss under the API surface (404)
    #[error("{0}")]
    NotFound(String),

    /// Authorization-code exchange with the identity provider failed
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// Web-identity federation exchange with STS failed
    #[error("Credential federation failed: {0}")]
    Federation(String),

    /// Object storage listing failed
    #[error("Storage listing failed: {0}")]
    Storage(String),

    /// Session store failure
    #[error("Session store error: {0}")]
    Session(#[from] crate::session::SessionStoreError),

    /// Anything else server-side
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,

            // Downstream transport and provider failures all collapse to 500:
            // the client contract does not distinguish "provider down" from
            // "provider rejected the request".
            ServerError::TokenExchange(_)
            | ServerError::Federation(_)
            | ServerError::Storage(_)
            | ServerError::Session(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create a forbidden error (403)
    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServerError::Forbidden(msg.into())
    }

    /// Create a not found error (404)
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServerError::NotFound(msg.into())
    }

    /// Create an internal error (500)
    pub fn internal(msg: impl Into<String>) -> Self {
        ServerError::Internal(msg.into())
    }
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Best-effort message extracted from the error
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "API error");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            message: self.to_string(),
        };

        let json = serde_json::to_string(&body)
            .unwrap_or_else(|_| format!(r#"{{"message":"{}"}}"#, FALLBACK_MESSAGE));

        (status, [("content-type", "application/json")], json).into_response()
    }
}

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
