//! Transports perform the actual round-trip for a client instance.
//!
//! [`HttpTransport`] talks to the network through reqwest; the mock transport
//! behind [`crate::mock::Mock`] answers from in-memory handlers.

mod http;

pub use http::HttpTransport;

use crate::request::{RequestDescriptor, Response};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// What a transport hands back before status validation and interceptors.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
}

impl RawResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            data,
        }
    }

    pub fn into_response(self, request: RequestDescriptor) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            data: self.data,
            request,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError>;

    fn name(&self) -> &'static str;
}

/// Failures raised while executing a request. Every variant carries the
/// descriptor that was sent so callers can inspect the effective config.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {source}")]
    Http {
        #[source]
        source: reqwest::Error,
        request: Box<RequestDescriptor>,
    },

    #[error("Request failed with status code {}", .response.status)]
    Status { response: Box<Response> },

    #[error("Timeout exceeded for {}", describe(.request))]
    Timeout { request: Box<RequestDescriptor> },

    #[error("Network error for {}", describe(.request))]
    Network { request: Box<RequestDescriptor> },

    #[error("Transport error: {message}")]
    Other {
        message: String,
        request: Box<RequestDescriptor>,
    },
}

fn describe(request: &RequestDescriptor) -> String {
    format!("{} {}", request.method, request.combined_url())
}

impl TransportError {
    pub fn request(&self) -> &RequestDescriptor {
        match self {
            TransportError::Http { request, .. }
            | TransportError::Timeout { request }
            | TransportError::Network { request }
            | TransportError::Other { request, .. } => request,
            TransportError::Status { response } => &response.request,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            TransportError::Status { response } => Some(response),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}
