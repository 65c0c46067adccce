//! Wire types for `POST /generate-rule`.
//!
//! The response side is deliberately lenient: every field of [`GenerationResult`] is optional and
//! a field with an unexpected shape is treated as absent instead of failing the request. The
//! verbatim body is kept for raw display.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body. Built fresh for every submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRequest {
    pub prompt: String,
    pub context_docs: Vec<String>,
}

/// Association between a phrase the user wrote and a canonical field, with a similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyMapping {
    pub user_phrase: String,
    pub mapped_to: String,
    pub similarity: Option<f64>,
}

/// Parsed 2xx response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationResult {
    pub explanation: Option<String>,
    pub used_keys: Option<Vec<String>>,
    pub key_mappings: Option<Vec<KeyMapping>>,
    pub retrieved_policy_snippets: Option<Vec<String>>,
    /// Opaque logic expression; passed through untouched.
    pub json_logic: Option<Value>,
    raw: Value,
}

fn lenient_field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key)?;
    serde_json::from_value(value.clone()).ok()
}

/// Items that fail to parse are skipped; a non-array value counts as absent.
fn lenient_list<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<Vec<T>> {
    let items = obj.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
    )
}

impl GenerationResult {
    /// Builds the typed view over an arbitrary JSON body. Never fails.
    pub fn from_value(raw: Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self {
                raw,
                ..Self::default()
            };
        };
        Self {
            explanation: lenient_field(obj, "explanation"),
            used_keys: lenient_list(obj, "used_keys"),
            key_mappings: lenient_list(obj, "key_mappings"),
            retrieved_policy_snippets: lenient_list(obj, "retrieved_policy_snippets"),
            json_logic: obj.get("json_logic").filter(|v| !v.is_null()).cloned(),
            raw: raw.clone(),
        }
    }

    /// The response body exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Best-effort message from a non-2xx body: `detail`, then `error`, else `Request failed: <status>`.
///
/// String values are used as-is; any other non-empty value (FastAPI validation errors send a list
/// in `detail`) is rendered as compact JSON.
pub fn server_error_message(status: u16, body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let from_field = |key: &str| -> Option<String> {
        match parsed.as_ref()?.get(key)? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    };
    from_field("detail")
        .or_else(|| from_field("error"))
        .unwrap_or_else(|| format!("Request failed: {}", status))
}
