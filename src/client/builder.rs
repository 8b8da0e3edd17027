use crate::client::instance::{ClientDefaults, HttpClient};
use crate::config::ClientConfig;
use crate::interceptors::{Interceptors, RequestInterceptor, ResponseInterceptor};
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating client instances with custom configuration.
///
/// Interceptors can only be attached here; a built instance is immutable.
pub struct HttpClientBuilder {
    config: ClientConfig,
    defaults: ClientDefaults,
    interceptors: Interceptors,
    transport: Option<Arc<dyn Transport>>,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            defaults: ClientDefaults::default(),
            interceptors: Interceptors::new(),
            transport: None,
        }
    }

    /// Start from environment configuration (`API_BASE_URL`, `API_HTTP_*`, ...).
    pub fn from_env() -> Self {
        Self::new().config(ClientConfig::from_env())
    }

    /// Use the given transport settings; a configured `base_url` becomes the default base URL.
    pub fn config(mut self, config: ClientConfig) -> Self {
        if let Some(base_url) = &config.base_url {
            self.defaults.base_url = Some(base_url.clone());
        }
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.defaults.base_url = Some(base_url.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.headers.insert(name.into(), value.into());
        self
    }

    /// Default per-request timeout (the transport's own timeout still applies).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.defaults.timeout = Some(timeout);
        self
    }

    pub fn defaults(mut self, defaults: ClientDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push_request(interceptor);
        self
    }

    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.interceptors.push_response(interceptor);
        self
    }

    pub fn interceptors(mut self, interceptors: Interceptors) -> Self {
        self.interceptors = interceptors;
        self
    }

    /// Replace the network transport (mocks, recording transports, ...).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the instance.
    pub fn build(self) -> Result<HttpClient> {
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };
        Ok(HttpClient::from_parts(
            self.defaults,
            self.interceptors,
            transport,
        ))
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
