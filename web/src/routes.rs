//! Route handlers.

use crate::error::AppError;
use crate::templates::HOMEPAGE;
use crate::{AppState, ANONYMOUS_COLOR};
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use graphext_extensions::{ExtensionStore, Settings};
use graphext_session::{AuthCallback, GraphClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Set when the user picked a new color.
    pub color: Option<String>,
}

/// Data the home page template renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub user_identity: Option<String>,
    pub color: String,
}

#[derive(Debug, Deserialize)]
struct Me {
    #[serde(rename = "userPrincipalName")]
    user_principal_name: String,
}

pub(crate) async fn homepage(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, AppError> {
    let page = home_page(&state, query.color).await?;
    Ok(Html(state.templates.render(HOMEPAGE, &page)?))
}

/// Resolves what the home page shows.
///
/// Anonymous visitors get the fallback color without any Graph call. For a
/// signed-in user a non-empty `selected` color is saved, otherwise the saved
/// color is read back (empty if none was ever saved).
pub async fn home_page(state: &AppState, selected: Option<String>) -> Result<HomePage, AppError> {
    if !state.session.is_logged_in().await {
        return Ok(HomePage {
            user_identity: None,
            color: ANONYMOUS_COLOR.to_string(),
        });
    }

    let response = state.session.get("me").await?;
    if !response.ok() {
        return Err(AppError::Graph {
            path: "me".to_string(),
            status: response.status(),
        });
    }
    let me: Me = response.json()?;

    let store = ExtensionStore::new(state.session.as_ref(), state.extension_name.as_str());

    let color = match selected.filter(|color| !color.is_empty()) {
        Some(color) => {
            let mut settings = Settings::new();
            settings.insert("color".to_string(), Value::from(color.as_str()));

            let response = store.write(&settings).await?;
            if !response.ok() {
                error!("Error saving extension: {} {}", response, response.text());
            }
            color
        }
        None => store.setting_str("color").await?.unwrap_or_default(),
    };

    debug!("Rendering home page for {}", me.user_principal_name);

    Ok(HomePage {
        user_identity: Some(me.user_principal_name),
        color,
    })
}

pub(crate) async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.session.login("/").await)
}

pub(crate) async fn logout(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.session.logout("/").await)
}

/// The application's redirect URI.
pub(crate) async fn authorized(
    State(state): State<AppState>,
    Query(callback): Query<AuthCallback>,
) -> Result<Redirect, AppError> {
    let redirect_to = state
        .session
        .complete_login(callback)
        .await
        .map_err(AppError::Login)?;
    Ok(Redirect::to(&redirect_to))
}
