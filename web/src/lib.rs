//! Web front end for the graphext sample.
//!
//! Serves one page that shows the signed-in user and a color preference kept
//! in an open extension on their Graph user object, plus the login/logout
//! routes and static assets.

mod error;
pub mod routes;
pub mod templates;

use anyhow::Result;
use axum::{routing::get, Router};
use graphext_session::GraphSession;
use handlebars::Handlebars;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;

pub use error::AppError;
pub use routes::{home_page, HomePage};

/// Extension name the color preference is stored under.
pub const DEFAULT_EXTENSION_NAME: &str = "graph-rust-sample";

/// Color shown to anonymous visitors.
pub const ANONYMOUS_COLOR: &str = "white";

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<GraphSession>,
    pub templates: Arc<Handlebars<'static>>,
    pub extension_name: String,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Builds the state, loading templates from `<static_dir>/templates`.
    pub fn new(
        session: Arc<GraphSession>,
        extension_name: impl Into<String>,
        static_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let static_dir = static_dir.as_ref().to_path_buf();
        let templates = templates::load_templates(&static_dir.join("templates"))?;

        Ok(Self {
            session,
            templates: Arc::new(templates),
            extension_name: extension_name.into(),
            static_dir,
        })
    }
}

/// Build the HTTP router with the given state.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(routes::homepage))
        .route("/login", get(routes::login))
        .route("/logout", get(routes::logout))
        .route("/login/authorized", get(routes::authorized))
        .nest_service("/static", static_files)
        .with_state(state)
}
