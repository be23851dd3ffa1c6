//! Open extension records.

use crate::error::{ExtensionError, ExtensionResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Type tag Graph uses to identify open extension payloads.
pub const OPEN_TYPE_EXTENSION: &str = "Microsoft.Graph.OpenTypeExtension";

/// Fields the request body sets before the caller's settings are overlaid.
const RESERVED_FIELDS: [&str; 3] = ["@odata.type", "extensionName", "id"];

/// Key/value settings stored in an open extension.
pub type Settings = Map<String, Value>;

/// An open extension as Graph returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    /// The extension name. Never changes once created.
    pub id: String,
    #[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
    pub odata_type: Option<String>,
    #[serde(rename = "extensionName", default, skip_serializing_if = "Option::is_none")]
    pub extension_name: Option<String>,
    /// Every other field of the extension.
    #[serde(flatten)]
    pub settings: Settings,
}

impl ExtensionRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Returns a setting if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}

/// Builds the create/update body for `ext_name`.
///
/// Settings are overlaid last, so a setting named like a reserved field
/// replaces it.
pub fn request_body(ext_name: &str, settings: &Settings) -> Value {
    let mut body = Map::new();
    body.insert("@odata.type".to_string(), Value::from(OPEN_TYPE_EXTENSION));
    body.insert("extensionName".to_string(), Value::from(ext_name));
    body.insert("id".to_string(), Value::from(ext_name));

    for (key, value) in settings {
        if RESERVED_FIELDS.contains(&key.as_str()) {
            warn!("Setting {:?} overrides extension field of {}", key, ext_name);
        }
        body.insert(key.clone(), value.clone());
    }

    Value::Object(body)
}

/// Checks that `ext_name` can be used as a single URL path segment.
pub(crate) fn validate_name(ext_name: &str) -> ExtensionResult<()> {
    if ext_name.is_empty() || ext_name.contains(['/', '?', '#']) {
        return Err(ExtensionError::InvalidName(ext_name.to_string()));
    }
    Ok(())
}

/// Entities may span segments (`users/{id}`) but cannot carry a query or fragment.
pub(crate) fn validate_entity(entity: &str) -> ExtensionResult<()> {
    if entity.trim_matches('/').is_empty() || entity.contains(['?', '#']) {
        return Err(ExtensionError::InvalidEntity(entity.to_string()));
    }
    Ok(())
}
