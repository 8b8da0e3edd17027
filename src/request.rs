//! Request descriptors and responses.
//!
//! A [`RequestDescriptor`] serializes to the same JSON object shape a caller
//! uses for per-call overrides (`url`, `method`, `baseURL`, `headers`,
//! `params`, `data`, `timeout`, plus any other keys kept in `extra`), so
//! overrides can be deep-merged onto it without knowing its Rust layout.

use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
    #[serde(alias = "head")]
    Head,
    #[serde(alias = "options")]
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full description of one outbound call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: Method,
    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Per-call timeout in milliseconds.
    #[serde(rename = "timeout", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Keys this type does not model (`auth`, `withCredentials`, ...). They
    /// survive override merges so interceptors can read them; the HTTP
    /// transport ignores them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.data = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// `baseURL` and `url` joined with exactly one `/`, or `url` alone when it
    /// is already absolute or there is no base.
    pub fn combined_url(&self) -> String {
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() && !is_absolute(&self.url) => {
                if self.url.is_empty() {
                    base.to_string()
                } else {
                    format!(
                        "{}/{}",
                        base.trim_end_matches('/'),
                        self.url.trim_start_matches('/')
                    )
                }
            }
            _ => self.url.clone(),
        }
    }

    /// The absolute URL this descriptor targets, including query parameters.
    pub fn full_url(&self) -> Result<Url> {
        let combined = self.combined_url();
        let mut url = Url::parse(&combined).map_err(|e| {
            Error::validation_with_context(
                format!("cannot build request URL from '{}'", combined),
                ErrorContext::new()
                    .with_field_path("url")
                    .with_details(e.to_string())
                    .with_source("request"),
            )
        })?;

        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                match value {
                    Value::Null => {}
                    Value::Array(items) => {
                        for item in items.iter().filter(|v| !v.is_null()) {
                            pairs.append_pair(key, &query_value(item));
                        }
                    }
                    other => {
                        pairs.append_pair(key, &query_value(other));
                    }
                }
            }
        }
        Ok(url)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

fn is_absolute(url: &str) -> bool {
    Url::parse(url).is_ok()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Response produced by a client instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON body; non-JSON bodies are carried as a string, empty bodies as `null`.
    pub data: Value,
    /// The descriptor that was actually sent, after defaults and interceptors.
    pub request: RequestDescriptor,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}
