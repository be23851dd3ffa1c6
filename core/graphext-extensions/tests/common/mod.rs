//! In-memory Graph double for extension store tests.

#![allow(dead_code)]

use async_trait::async_trait;
use graphext_session::{GraphClient, GraphResponse, SessionError, SessionResult};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// A request the double received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub verb: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Serves `GET <entity>?$select=id&$expand=extensions`, `POST <entity>/extensions`
/// and `PATCH <entity>/extensions/<name>` from memory. PATCH replaces the stored
/// extension with the request body.
#[derive(Default)]
pub struct FakeGraph {
    extensions: Mutex<HashMap<String, Vec<Map<String, Value>>>>,
    calls: Mutex<Vec<Call>>,
    /// Status returned for creates and updates instead of applying them.
    reject_writes_with: Option<u16>,
    /// Every request fails as a transport error.
    offline: bool,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn rejecting_writes(status: u16) -> Self {
        Self {
            reject_writes_with: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, verb: &str) -> usize {
        self.calls().iter().filter(|c| c.verb == verb).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Seeds an extension directly, bypassing the call log.
    pub fn seed(&self, entity: &str, extension: Value) {
        let Value::Object(map) = extension else {
            panic!("extension must be a JSON object");
        };
        self.extensions
            .lock()
            .unwrap()
            .entry(entity.to_string())
            .or_default()
            .push(map);
    }

    fn record(&self, verb: &'static str, path: &str, body: Option<&Value>) {
        self.calls.lock().unwrap().push(Call {
            verb,
            path: path.to_string(),
            body: body.cloned(),
        });
    }

    fn has_id(extension: &Map<String, Value>, id: &str) -> bool {
        extension.get("id").and_then(Value::as_str) == Some(id)
    }

    fn body_id(body: &Value) -> String {
        body["id"].as_str().unwrap_or_default().to_string()
    }
}

#[async_trait]
impl GraphClient for FakeGraph {
    async fn get(&self, path: &str) -> SessionResult<GraphResponse> {
        self.record("GET", path, None);
        if self.offline {
            return Err(SessionError::Network("connection refused".to_string()));
        }

        let Some(entity) = path.strip_suffix("?$select=id&$expand=extensions") else {
            return Ok(GraphResponse::new(400, "unsupported query"));
        };

        let extensions = self
            .extensions
            .lock()
            .unwrap()
            .get(entity)
            .cloned()
            .unwrap_or_default();

        Ok(GraphResponse::from_json(
            200,
            &json!({ "id": "entity-id", "extensions": extensions }),
        ))
    }

    async fn post(&self, path: &str, body: &Value) -> SessionResult<GraphResponse> {
        self.record("POST", path, Some(body));
        if self.offline {
            return Err(SessionError::Network("connection refused".to_string()));
        }
        if let Some(status) = self.reject_writes_with {
            return Ok(GraphResponse::new(status, "rejected"));
        }

        let Some(entity) = path.strip_suffix("/extensions") else {
            return Ok(GraphResponse::new(400, "unsupported path"));
        };

        let id = Self::body_id(body);
        let mut all = self.extensions.lock().unwrap();
        let list = all.entry(entity.to_string()).or_default();
        if list.iter().any(|e| Self::has_id(e, &id)) {
            return Ok(GraphResponse::new(409, "nameAlreadyExists"));
        }
        let Value::Object(map) = body.clone() else {
            return Ok(GraphResponse::new(400, "body must be an object"));
        };
        list.push(map);

        Ok(GraphResponse::from_json(201, body))
    }

    async fn patch(&self, path: &str, body: &Value) -> SessionResult<GraphResponse> {
        self.record("PATCH", path, Some(body));
        if self.offline {
            return Err(SessionError::Network("connection refused".to_string()));
        }
        if let Some(status) = self.reject_writes_with {
            return Ok(GraphResponse::new(status, "rejected"));
        }

        let Some((entity, name)) = path.split_once("/extensions/") else {
            return Ok(GraphResponse::new(400, "unsupported path"));
        };

        let mut all = self.extensions.lock().unwrap();
        let Some(existing) = all
            .get_mut(entity)
            .and_then(|list| list.iter_mut().find(|e| Self::has_id(e, name)))
        else {
            return Ok(GraphResponse::new(404, "extension not found"));
        };
        let Value::Object(map) = body.clone() else {
            return Ok(GraphResponse::new(400, "body must be an object"));
        };
        *existing = map;

        Ok(GraphResponse::new(204, ""))
    }
}
