use async_trait::async_trait;

use super::document::RemoteClientConfig;

/// Where remote client configuration comes from.
///
/// Both lookups swallow their own failures and return `None`.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Last known value without network access.
    async fn from_cache(&self) -> Option<RemoteClientConfig>;

    /// Fresh value from the remote service.
    async fn from_remote(&self) -> Option<RemoteClientConfig>;

    fn name(&self) -> &'static str;
}

/// Fixed configuration, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    config: Option<RemoteClientConfig>,
}

impl StaticSource {
    pub fn new(config: Option<RemoteClientConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigSource for StaticSource {
    async fn from_cache(&self) -> Option<RemoteClientConfig> {
        self.config.clone()
    }

    async fn from_remote(&self) -> Option<RemoteClientConfig> {
        self.config.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
