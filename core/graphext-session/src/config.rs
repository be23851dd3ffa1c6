//! Session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Graph session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSessionConfig {
    /// Application (client) ID registered with the identity platform.
    pub client_id: String,
    /// Client secret for the registered application.
    pub client_secret: String,
    /// Redirect URI the identity platform sends the authorization code to.
    pub redirect_uri: String,
    /// Delegated permission scopes requested at login.
    pub scopes: Vec<String>,
    /// Base URL for Graph requests (e.g. `https://graph.microsoft.com/v1.0`).
    pub api_base_url: String,
    /// Authority for the authorize and token endpoints.
    pub authority_url: String,
    /// File to persist tokens in across restarts. `None` keeps them in memory only.
    pub state_cache: Option<PathBuf>,
}

impl Default for GraphSessionConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:5000/login/authorized".to_string(),
            scopes: vec![
                "User.Read".to_string(),
                "User.ReadWrite".to_string(),
                "offline_access".to_string(),
            ],
            api_base_url: "https://graph.microsoft.com/v1.0".to_string(),
            authority_url: "https://login.microsoftonline.com/common".to_string(),
            state_cache: None,
        }
    }
}

impl GraphSessionConfig {
    pub(crate) fn authorize_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/authorize", self.authority_url.trim_end_matches('/'))
    }

    pub(crate) fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority_url.trim_end_matches('/'))
    }

    /// Resolves a Graph path (`me`, `/me/extensions`) against `api_base_url`.
    /// Absolute URLs are returned unchanged.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
