//! Read and upsert of open extensions.
//!
//! Upsert is read-then-write with no transactional guarantee: two concurrent
//! upserts for the same entity and name can lose an update, or the second
//! create can be rejected by Graph as a duplicate. Neither is retried.

use crate::error::{ExtensionError, ExtensionResult};
use crate::record::{request_body, validate_entity, validate_name, ExtensionRecord, Settings};
use graphext_session::{GraphClient, GraphResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Entity extensions attach to when none is given: the signed-in user.
pub const DEFAULT_ENTITY: &str = "me";

/// An entity fetched with its extensions expanded inline.
#[derive(Debug, Deserialize)]
struct ExpandedEntity {
    #[serde(default)]
    extensions: Option<Vec<Value>>,
}

/// Reads the extension named `ext_name` from `entity`.
///
/// Returns `Ok(None)` when the entity has no such extension.
pub async fn read_extension<C>(
    client: &C,
    ext_name: &str,
    entity: &str,
) -> ExtensionResult<Option<ExtensionRecord>>
where
    C: GraphClient + ?Sized,
{
    validate_name(ext_name)?;
    validate_entity(entity)?;

    let response = client
        .get(&format!("{entity}?$select=id&$expand=extensions"))
        .await?;

    if !response.ok() {
        return Err(ExtensionError::Rejected {
            status: response.status(),
            body: response.text(),
        });
    }

    let expanded: ExpandedEntity = response
        .json()
        .map_err(|e| ExtensionError::Malformed(e.to_string()))?;

    let found = expanded
        .extensions
        .unwrap_or_default()
        .into_iter()
        .find(|extension| extension.get("id").and_then(Value::as_str) == Some(ext_name));

    match found {
        Some(extension) => {
            let record = serde_json::from_value(extension)
                .map_err(|e| ExtensionError::Malformed(e.to_string()))?;
            Ok(Some(record))
        }
        None => {
            debug!("Extension {} not found on {}", ext_name, entity);
            Ok(None)
        }
    }
}

/// Creates or replaces the extension named `ext_name` on `entity`.
///
/// Existing settings are replaced as a whole, not merged. The Graph response
/// is returned unmodified; check [`GraphResponse::ok`] for success.
pub async fn write_extension<C>(
    client: &C,
    ext_name: &str,
    entity: &str,
    settings: &Settings,
) -> ExtensionResult<GraphResponse>
where
    C: GraphClient + ?Sized,
{
    let body = request_body(ext_name, settings);

    let response = if read_extension(client, ext_name, entity).await?.is_some() {
        info!("Updating extension {} on {}", ext_name, entity);
        client
            .patch(&format!("{entity}/extensions/{ext_name}"), &body)
            .await?
    } else {
        info!("Creating extension {} on {}", ext_name, entity);
        client.post(&format!("{entity}/extensions"), &body).await?
    };

    Ok(response)
}

/// One application's extension on one entity.
pub struct ExtensionStore<'a, C: ?Sized> {
    client: &'a C,
    ext_name: String,
    entity: String,
}

impl<'a, C> ExtensionStore<'a, C>
where
    C: GraphClient + ?Sized,
{
    /// A store for `ext_name` on the signed-in user.
    pub fn new(client: &'a C, ext_name: impl Into<String>) -> Self {
        Self::with_entity(client, ext_name, DEFAULT_ENTITY)
    }

    pub fn with_entity(
        client: &'a C,
        ext_name: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            client,
            ext_name: ext_name.into(),
            entity: entity.into(),
        }
    }

    pub fn ext_name(&self) -> &str {
        &self.ext_name
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub async fn read(&self) -> ExtensionResult<Option<ExtensionRecord>> {
        read_extension(self.client, &self.ext_name, &self.entity).await
    }

    pub async fn write(&self, settings: &Settings) -> ExtensionResult<GraphResponse> {
        write_extension(self.client, &self.ext_name, &self.entity, settings).await
    }

    /// Reads one string setting, `None` if the extension or the setting is absent.
    pub async fn setting_str(&self, key: &str) -> ExtensionResult<Option<String>> {
        Ok(self
            .read()
            .await?
            .and_then(|record| record.get_str(key).map(str::to_string)))
    }
}
