//! Microsoft Graph session for graphext.
//!
//! Provides the authenticated transport the rest of the workspace builds on:
//! - [`GraphClient`]: the three REST verbs (`get`, `post`, `patch`) as a trait,
//!   so callers can substitute a test double
//! - [`GraphSession`]: the real client, which also owns the OAuth2
//!   authorization-code login flow, token refresh and an optional on-disk
//!   state cache
//!
//! # Example
//!
//! ```no_run
//! use graphext_session::{GraphClient, GraphSession, GraphSessionConfig};
//!
//! # async fn run() -> graphext_session::SessionResult<()> {
//! let session = GraphSession::new(GraphSessionConfig {
//!     client_id: "my-app-id".to_string(),
//!     client_secret: "my-secret".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let authorize_url = session.login("/").await;
//! println!("sign in at {authorize_url}");
//!
//! // ...after the redirect URI has been handled:
//! let me = session.get("me").await?;
//! println!("{}", me.text());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod session;

pub use client::{GraphClient, GraphResponse};
pub use config::GraphSessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::{AuthCallback, GraphSession};
