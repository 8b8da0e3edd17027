use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::interceptors::Interceptors;
use crate::request::{RequestDescriptor, Response};
use crate::transport::{Transport, TransportError};
use crate::{Error, Result};

/// Configuration applied under every descriptor an instance executes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDefaults {
    pub base_url: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl ClientDefaults {
    /// Fill in whatever the descriptor leaves unset. Descriptor values win;
    /// headers merge key by key, ignoring ASCII case.
    pub fn apply(&self, mut request: RequestDescriptor) -> RequestDescriptor {
        if request.base_url.is_none() {
            request.base_url = self.base_url.clone();
        }
        for (name, value) in &self.headers {
            let present = request
                .headers
                .keys()
                .any(|existing| existing.eq_ignore_ascii_case(name));
            if !present {
                request.headers.insert(name.clone(), value.clone());
            }
        }
        if request.timeout_ms.is_none() {
            request.timeout_ms = self
                .timeout
                .map(|t| t.as_millis().min(u64::MAX as u128) as u64);
        }
        request
    }
}

/// Capability every client instance exposes: inspectable defaults and
/// interceptors, and the ability to execute a descriptor.
#[async_trait]
pub trait ClientInstance: Send + Sync {
    fn defaults(&self) -> &ClientDefaults;

    fn interceptors(&self) -> &Interceptors;

    async fn execute(&self, request: RequestDescriptor) -> Result<Response>;
}

/// Client instance backed by a [`Transport`].
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) defaults: ClientDefaults,
    pub(crate) interceptors: Interceptors,
    pub(crate) transport: Arc<dyn Transport>,
}

impl HttpClient {
    pub fn builder() -> super::builder::HttpClientBuilder {
        super::builder::HttpClientBuilder::new()
    }

    /// Assemble an instance from already-built parts.
    pub fn from_parts(
        defaults: ClientDefaults,
        interceptors: Interceptors,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            defaults,
            interceptors,
            transport,
        }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("defaults", &self.defaults)
            .field("interceptors", &self.interceptors)
            .field("transport", &self.transport.name())
            .finish()
    }
}

#[async_trait]
impl ClientInstance for HttpClient {
    fn defaults(&self) -> &ClientDefaults {
        &self.defaults
    }

    fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    async fn execute(&self, request: RequestDescriptor) -> Result<Response> {
        let request = self.defaults.apply(request);
        let request = self.interceptors.run_request(request).await?;

        debug!(
            transport = self.transport.name(),
            method = %request.method,
            url = %request.combined_url(),
            "executing request"
        );

        let outcome = match self.transport.send(&request).await {
            Ok(raw) => {
                let response = raw.into_response(request);
                if response.is_success() {
                    Ok(response)
                } else {
                    Err(Error::Transport(TransportError::Status {
                        response: Box::new(response),
                    }))
                }
            }
            Err(e) => Err(Error::Transport(e)),
        };

        self.interceptors.run_response(outcome).await
    }
}
