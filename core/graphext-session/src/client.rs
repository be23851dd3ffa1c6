//! The narrow REST capability the rest of the workspace depends on.

use crate::error::{SessionError, SessionResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A completed Graph response: status code plus the buffered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphResponse {
    status: u16,
    body: Vec<u8>,
}

impl GraphResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Builds a response carrying a JSON body.
    pub fn from_json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string().into_bytes())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for a 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SessionResult<T> {
        serde_json::from_slice(&self.body).map_err(SessionError::from)
    }
}

impl std::fmt::Display for GraphResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<GraphResponse [{}]>", self.status)
    }
}

/// Authenticated Graph verbs.
///
/// Paths are relative to the Graph API root (`me`, `me/extensions`).
/// Implementations return non-2xx responses as `Ok`; only transport and
/// authentication failures are errors.
#[async_trait]
pub trait GraphClient: Send + Sync {
    async fn get(&self, path: &str) -> SessionResult<GraphResponse>;

    async fn post(&self, path: &str, body: &Value) -> SessionResult<GraphResponse>;

    async fn patch(&self, path: &str, body: &Value) -> SessionResult<GraphResponse>;
}
