//! Graph session implementation.
//!
//! Runs the OAuth2 authorization-code flow against the Microsoft identity
//! platform and sends authenticated requests to Microsoft Graph.

use crate::client::{GraphClient, GraphResponse};
use crate::config::GraphSessionConfig;
use crate::error::{SessionError, SessionResult};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SDK_VERSION: &str = concat!("graphext-rust/", env!("CARGO_PKG_VERSION"));

/// Access tokens that expire within this window are refreshed before use.
const EXPIRY_MARGIN: Duration = Duration::from_secs(5);

/// OAuth2 tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OAuthTokens {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<SystemTime>,
}

#[derive(Debug)]
struct SessionState {
    tokens: Option<OAuthTokens>,
    /// Anti-forgery value of the login in progress.
    auth_state: Option<String>,
    /// Where to send the browser once login completes.
    login_redirect: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

/// Query parameters the identity platform appends to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// An authenticated connection to Microsoft Graph.
///
/// One session per process: the tokens belong to whoever last signed in.
pub struct GraphSession {
    config: GraphSessionConfig,
    client: Client,
    state: RwLock<SessionState>,
}

impl GraphSession {
    /// Creates a new session, restoring tokens from the state cache if one is configured.
    pub fn new(config: GraphSessionConfig) -> SessionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(SDK_VERSION)
            .build()
            .map_err(|e| SessionError::Config(format!("failed to create HTTP client: {e}")))?;

        let tokens = match config.state_cache.as_deref() {
            Some(path) if path.exists() => load_cached_tokens(path),
            _ => None,
        };

        Ok(Self {
            config,
            client,
            state: RwLock::new(SessionState {
                tokens,
                auth_state: None,
                login_redirect: "/".to_string(),
            }),
        })
    }

    pub fn config(&self) -> &GraphSessionConfig {
        &self.config
    }

    /// Returns whether an access token is held.
    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.tokens.is_some()
    }

    /// Sets existing tokens (e.g., issued out of band).
    pub async fn set_tokens(&self, access_token: String, refresh_token: Option<String>) {
        let tokens = OAuthTokens {
            access_token,
            refresh_token,
            expires_at: None,
        };
        self.state.write().await.tokens = Some(tokens);
    }

    /// Starts an interactive login.
    ///
    /// Returns the authorize URL to send the browser to. `redirect_to` is
    /// where [`complete_login`](Self::complete_login) sends it afterwards.
    pub async fn login(&self, redirect_to: &str) -> String {
        let auth_state = Uuid::new_v4().to_string();
        {
            let mut state = self.state.write().await;
            state.auth_state = Some(auth_state.clone());
            state.login_redirect = redirect_to.to_string();
        }

        debug!("Starting Graph login, returning to {}", redirect_to);

        format!(
            "{}?\
            response_type=code&\
            client_id={}&\
            redirect_uri={}&\
            scope={}&\
            state={}&\
            prompt=select_account",
            self.config.authorize_endpoint(),
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scopes.join(" ")),
            urlencoding::encode(&auth_state)
        )
    }

    /// Handles the identity platform's call to the redirect URI.
    ///
    /// Exchanges the authorization code for tokens and returns the redirect
    /// target recorded by [`login`](Self::login).
    pub async fn complete_login(&self, callback: AuthCallback) -> SessionResult<String> {
        if let Some(error) = callback.error {
            let description = callback.error_description.unwrap_or_default();
            return Err(SessionError::Auth(format!("{error}: {description}")));
        }

        {
            let state = self.state.read().await;
            match (&state.auth_state, &callback.state) {
                (Some(expected), Some(returned)) if expected == returned => {}
                _ => return Err(SessionError::StateMismatch),
            }
        }

        let code = callback
            .code
            .ok_or_else(|| SessionError::Auth("no authorization code in callback".to_string()))?;

        debug!("Exchanging auth code for tokens");

        let scope = self.config.scopes.join(" ");
        let tokens = self
            .request_token(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
            ])
            .await?;

        self.save_cached_tokens(&tokens).await?;

        let redirect_to = {
            let mut state = self.state.write().await;
            state.tokens = Some(tokens);
            state.auth_state = None;
            state.login_redirect.clone()
        };

        info!("Graph login successful");
        Ok(redirect_to)
    }

    /// Forgets the signed-in user and returns `redirect_to`.
    pub async fn logout(&self, redirect_to: &str) -> String {
        {
            let mut state = self.state.write().await;
            state.tokens = None;
            state.auth_state = None;
        }

        if let Some(path) = self.config.state_cache.as_deref() {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove state cache {}: {}", path.display(), e);
                }
            }
        }

        info!("Graph session logged out");
        redirect_to.to_string()
    }

    /// Gets the current access token, refreshing it if it is about to expire.
    async fn access_token(&self) -> SessionResult<String> {
        let (access_token, refresh_token, expiring) = {
            let guard = self.state.read().await;
            let tokens = guard.tokens.as_ref().ok_or(SessionError::NotAuthenticated)?;

            let expiring = tokens
                .expires_at
                .is_some_and(|exp| SystemTime::now() + EXPIRY_MARGIN > exp);

            (
                tokens.access_token.clone(),
                tokens.refresh_token.clone(),
                expiring,
            )
        }; // read lock dropped here

        if !expiring {
            return Ok(access_token);
        }

        let refresh_token = refresh_token.ok_or(SessionError::NotAuthenticated)?;
        self.refresh_token(refresh_token).await
    }

    /// Refreshes the access token.
    async fn refresh_token(&self, refresh_token: String) -> SessionResult<String> {
        debug!("Refreshing Graph access token");

        let scope = self.config.scopes.join(" ");
        let mut tokens = self
            .request_token(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
            ])
            .await?;

        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token);
        }

        self.save_cached_tokens(&tokens).await?;

        let access_token = tokens.access_token.clone();
        self.state.write().await.tokens = Some(tokens);

        Ok(access_token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> SessionResult<OAuthTokens> {
        let response = self
            .client
            .post(self.config.token_endpoint())
            .form(form)
            .send()
            .await
            .map_err(|e| SessionError::Network(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(SessionError::Auth(format!("token request failed: {error}")));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Auth(format!("failed to parse token response: {e}")))?;

        let expires_at = token_response
            .expires_in
            .map(|secs| SystemTime::now() + Duration::from_secs(secs));

        Ok(OAuthTokens {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_at,
        })
    }

    async fn save_cached_tokens(&self, tokens: &OAuthTokens) -> SessionResult<()> {
        let Some(path) = self.config.state_cache.as_deref() else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(tokens)?;
        tokio::fs::write(path, json).await?;
        debug!("Saved session state to {}", path.display());
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> SessionResult<GraphResponse> {
        let access_token = self.access_token().await?;
        let url = self.config.api_url(path);

        debug!("Graph request: {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&access_token)
            .header(ACCEPT, "application/json")
            .header("SdkVersion", SDK_VERSION)
            .header("client-request-id", Uuid::new_v4().to_string())
            .header("return-client-request-id", "true");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SessionError::Network(format!("{method} {path} failed: {e}")))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SessionError::Network(format!("read {path} response failed: {e}")))?;

        Ok(GraphResponse::new(status, bytes.to_vec()))
    }
}

#[async_trait]
impl GraphClient for GraphSession {
    async fn get(&self, path: &str) -> SessionResult<GraphResponse> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> SessionResult<GraphResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> SessionResult<GraphResponse> {
        self.send(Method::PATCH, path, Some(body)).await
    }
}

fn load_cached_tokens(path: &Path) -> Option<OAuthTokens> {
    let loaded = std::fs::read(path)
        .map_err(SessionError::from)
        .and_then(|bytes| serde_json::from_slice::<OAuthTokens>(&bytes).map_err(SessionError::from));

    match loaded {
        Ok(tokens) => {
            info!("Restored session state from {}", path.display());
            Some(tokens)
        }
        Err(e) => {
            warn!("Ignoring unreadable state cache {}: {}", path.display(), e);
            None
        }
    }
}
