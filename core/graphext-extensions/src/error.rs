//! Extension store error types.

use graphext_session::SessionError;
use thiserror::Error;

/// Result type for extension operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Errors that can occur reading or writing open extensions.
///
/// A missing extension is not an error; reads return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// Transport or authentication failure from the session.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Graph answered the extension lookup with a non-2xx status.
    #[error("extension lookup rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The lookup response did not have the expected shape.
    #[error("malformed extension response: {0}")]
    Malformed(String),

    #[error("invalid extension name: {0:?}")]
    InvalidName(String),

    #[error("invalid entity: {0:?}")]
    InvalidEntity(String),
}
