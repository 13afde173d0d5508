//! Render data context used for template rendering and cache keys.
//!
//! A [`RenderData`] is the bag of configuration values substituted into
//! template text. The same bag also feeds cache-key derivation, which is
//! why it must serialize canonically: two bags with identical contents but
//! different insertion order have to produce identical keys.

// Internal imports (std, crate)
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::core::error::{Error, Result};

/// Configuration values substituted into templates during rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderData {
    values: Map<String, JsonValue>,
}

impl RenderData {
    /// Create an empty render data bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Build render data from any serializable value.
    ///
    /// The value must serialize to a JSON object; anything else (arrays,
    /// scalars) is a configuration error.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            JsonValue::Object(values) => Ok(Self { values }),
            other => Err(Error::config(format!(
                "render data must serialize to an object, got {other}"
            ))),
        }
    }

    /// Add a value to the context
    pub fn insert(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// Value of `key` as a string slice, when present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(JsonValue::as_str)
    }

    /// Value of `key` as a bool, defaulting to false when absent
    pub fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// The underlying JSON object
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.values.clone())
    }

    /// Canonical serialization for cache keys.
    ///
    /// Object keys are emitted in sorted order at every nesting level;
    /// array order is preserved (it is semantic). Structurally identical
    /// data always yields the same string.
    pub fn canonical_string(&self) -> String {
        canonicalize(&JsonValue::Object(self.values.clone())).to_string()
    }
}

fn canonicalize(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            JsonValue::Object(sorted)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
