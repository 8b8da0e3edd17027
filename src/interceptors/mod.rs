//! Request/response interceptor hooks attached to a client instance.
//!
//! Interceptors are registered once through [`crate::client::HttpClientBuilder`]
//! and apply uniformly to every call routed through that instance; the chain
//! is never mutated after the instance is built.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::request::{RequestDescriptor, Response};
use crate::{Error, Result};

/// Runs before the transport; may rewrite the descriptor or abort the call.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor>;
}

/// Runs after the transport. `on_error` may recover by returning `Ok`.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn on_response(&self, response: Response) -> Result<Response> {
        Ok(response)
    }

    async fn on_error(&self, error: Error) -> Result<Response> {
        Err(error)
    }
}

/// Ordered interceptor chains for one client instance.
#[derive(Clone, Default)]
pub struct Interceptors {
    request: Vec<Arc<dyn RequestInterceptor>>,
    response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request<I: RequestInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.request.push(Arc::new(interceptor));
        self
    }

    pub fn with_response<I: ResponseInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.response.push(Arc::new(interceptor));
        self
    }

    pub(crate) fn push_request(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.request.push(interceptor);
    }

    pub(crate) fn push_response(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.response.push(interceptor);
    }

    pub fn request_len(&self) -> usize {
        self.request.len()
    }

    pub fn response_len(&self) -> usize {
        self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request.is_empty() && self.response.is_empty()
    }

    /// Run request hooks in registration order, first registered first.
    ///
    /// Axios runs request interceptors in reverse registration order; here
    /// both chains run in the order they were added.
    pub async fn run_request(&self, mut request: RequestDescriptor) -> Result<RequestDescriptor> {
        for ic in &self.request {
            request = ic.on_request(request).await?;
        }
        Ok(request)
    }

    /// Run response hooks in registration order, switching between the success
    /// and error paths as each hook decides.
    pub async fn run_response(&self, mut outcome: Result<Response>) -> Result<Response> {
        for ic in &self.response {
            outcome = match outcome {
                Ok(resp) => ic.on_response(resp).await,
                Err(err) => ic.on_error(err).await,
            };
        }
        outcome
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .finish()
    }
}

/// Pass-through hooks that log every call; a starting point for custom interceptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInterceptor;

#[async_trait]
impl RequestInterceptor for TracingInterceptor {
    async fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor> {
        debug!(method = %request.method, url = %request.combined_url(), "request");
        Ok(request)
    }
}

#[async_trait]
impl ResponseInterceptor for TracingInterceptor {
    async fn on_response(&self, response: Response) -> Result<Response> {
        debug!(status = response.status, url = %response.request.combined_url(), "response");
        Ok(response)
    }

    async fn on_error(&self, error: Error) -> Result<Response> {
        warn!(error = %error, "request failed");
        Err(error)
    }
}
