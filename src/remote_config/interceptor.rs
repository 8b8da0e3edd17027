use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::BaseUrlResolver;
use crate::interceptors::RequestInterceptor;
use crate::request::RequestDescriptor;
use crate::Result;

/// Points each request at the base URL configured for its endpoint, if any.
pub struct RemoteBaseUrlInterceptor {
    resolver: Arc<dyn BaseUrlResolver>,
}

impl RemoteBaseUrlInterceptor {
    pub fn new(resolver: Arc<dyn BaseUrlResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl RequestInterceptor for RemoteBaseUrlInterceptor {
    async fn on_request(&self, mut request: RequestDescriptor) -> Result<RequestDescriptor> {
        if let Some(base_url) = self.resolver.base_url_for(&request.url).await {
            debug!(url = %request.url, base_url = %base_url, "using remote base URL");
            request.base_url = Some(base_url);
        }
        Ok(request)
    }
}
