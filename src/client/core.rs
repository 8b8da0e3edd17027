use std::sync::Arc;

use crate::client::context::CallContext;
use crate::client::dispatch::dispatch;
use crate::client::instance::{ClientInstance, HttpClient};
use crate::request::{RequestDescriptor, Response};
use crate::Result;

/// Entry point for domain API functions.
///
/// Holds the default instance, constructed once at startup and shared by every
/// call; per-call behavior comes from the [`CallContext`].
#[derive(Clone, Default)]
pub struct ApiClient {
    default_instance: Option<Arc<dyn ClientInstance>>,
}

impl ApiClient {
    pub fn new(default_instance: Arc<dyn ClientInstance>) -> Self {
        Self {
            default_instance: Some(default_instance),
        }
    }

    /// A client with no default instance; only instance or mock contexts can succeed.
    pub fn without_default() -> Self {
        Self {
            default_instance: None,
        }
    }

    /// Build the default instance from environment configuration.
    pub fn from_env() -> Result<Self> {
        let client = HttpClient::builder().config(crate::ClientConfig::from_env()).build()?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn default_instance(&self) -> Option<&Arc<dyn ClientInstance>> {
        self.default_instance.as_ref()
    }

    pub async fn request(&self, context: &CallContext, request: RequestDescriptor) -> Result<Response> {
        dispatch(context, request, self.default_instance.as_ref()).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field(
                "default_instance",
                &self.default_instance.as_ref().map(|i| i.defaults()),
            )
            .finish()
    }
}
