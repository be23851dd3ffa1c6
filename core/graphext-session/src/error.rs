//! Error types for the Graph session.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur talking to Graph or the identity platform.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Authentication error reported by the identity platform.
    #[error("authentication error: {0}")]
    Auth(String),

    /// No usable access token is held.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The `state` returned to the redirect URI does not match the login in progress.
    #[error("state returned to redirect URI does not match")]
    StateMismatch,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// State cache I/O error.
    #[error("state cache error: {0}")]
    Io(#[from] std::io::Error),
}
