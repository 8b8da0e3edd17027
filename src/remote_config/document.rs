use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote client configuration document.
///
/// ```json
/// { "base_url": { "/something": "https://eu.example.com" } }
/// ```
///
/// Keys of `base_url` are matched in document order; unknown top-level keys
/// are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteClientConfig {
    #[serde(default)]
    pub base_url: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteClientConfig {
    /// Parse a document, accepting either a JSON object or a string holding one.
    pub fn from_value(value: Value) -> Option<Self> {
        let value = match value {
            Value::String(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).ok()?,
            Value::Object(_) => value,
            _ => return None,
        };
        serde_json::from_value(value).ok()
    }

    /// First `base_url` entry whose key starts with `endpoint`.
    ///
    /// Only string values count as a base URL; a non-object `base_url` yields nothing.
    pub fn base_url_for(&self, endpoint: &str) -> Option<String> {
        let entries = self.base_url.as_object()?;
        let (_, value) = entries.iter().find(|(key, _)| key.starts_with(endpoint))?;
        value.as_str().map(str::to_string)
    }
}
