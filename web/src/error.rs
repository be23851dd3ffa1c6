//! Mapping of handler failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use graphext_extensions::ExtensionError;
use graphext_session::SessionError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors a route handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Extension(#[from] ExtensionError),

    /// Failure completing the login at the redirect URI.
    #[error("login failed: {0}")]
    Login(SessionError),

    #[error("graph request {path} failed with status {status}")]
    Graph { path: String, status: u16 },

    #[error("template error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Login(SessionError::StateMismatch) => StatusCode::BAD_REQUEST,
            AppError::Login(SessionError::Auth(_)) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, status.canonical_reason().unwrap_or("Error")).into_response()
    }
}
