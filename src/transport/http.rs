use super::{RawResponse, Transport, TransportError};
use crate::config::ClientConfig;
use crate::request::{Method, RequestDescriptor};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL '{}'", proxy_url),
                    ErrorContext::new()
                        .with_field_path("API_PROXY_URL")
                        .with_details(e.to_string())
                        .with_source("transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                "failed to build HTTP client",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("transport"),
            )
        })?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client (shares its connection pool).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }

    fn wrap(request: &RequestDescriptor, e: reqwest::Error) -> TransportError {
        let request = Box::new(request.clone());
        if e.is_timeout() {
            TransportError::Timeout { request }
        } else if e.is_connect() {
            TransportError::Network { request }
        } else {
            TransportError::Http { source: e, request }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> std::result::Result<RawResponse, TransportError> {
        let url = request.full_url().map_err(|e| TransportError::Other {
            message: e.to_string(),
            request: Box::new(request.clone()),
        })?;

        debug!(method = %request.method, url = %url, "sending HTTP request");

        let mut req = self.client.request(Self::method(request.method), url);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.data {
            req = req.json(body);
        }
        if let Some(timeout) = request.timeout_duration() {
            req = req.timeout(timeout);
        }

        let response = req.send().await.map_err(|e| Self::wrap(request, e))?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await.map_err(|e| Self::wrap(request, e))?;

        // Prefer JSON; anything else is surfaced as text.
        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };

        debug!(status, "received HTTP response");

        Ok(RawResponse {
            status,
            headers,
            data,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
