use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::document::RemoteClientConfig;
use super::source::ConfigSource;
use crate::client::{ClientInstance, HttpClient};
use crate::config::{ClientConfig, DEFAULT_CONFIG_CACHE_TTL_SECS};
use crate::request::RequestDescriptor;
use crate::{Error, ErrorContext, Result};

struct CachedConfig {
    config: RemoteClientConfig,
    expires_at: Instant,
}

/// Reads client configuration from a Flagr flag's variant attachment.
///
/// Successful evaluations are kept in memory for `cache_ttl` and served by
/// [`ConfigSource::from_cache`].
pub struct FlagrSource {
    client: Arc<dyn ClientInstance>,
    flag_id: i64,
    entity_context: Map<String, Value>,
    cache_ttl: Duration,
    cached: ArcSwapOption<CachedConfig>,
}

impl std::fmt::Debug for FlagrSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagrSource")
            .field("flag_id", &self.flag_id)
            .field("entity_context", &self.entity_context)
            .field("cache_ttl", &self.cache_ttl)
            .field("cached", &self.cached.load().is_some())
            .finish()
    }
}

impl FlagrSource {
    /// Evaluate `flag_id` through `client`, whose base URL points at the Flagr API.
    pub fn new(client: Arc<dyn ClientInstance>, flag_id: i64) -> Self {
        Self {
            client,
            flag_id,
            entity_context: Map::new(),
            cache_ttl: Duration::from_secs(DEFAULT_CONFIG_CACHE_TTL_SECS),
            cached: ArcSwapOption::empty(),
        }
    }

    /// Build from `FLAGR_URL` / `FLAGR_FLAG_ID`; the URL is required.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let flagr_url = config.flagr_url.as_deref().ok_or_else(|| {
            Error::configuration_with_context(
                "Flagr URL must be set",
                ErrorContext::new()
                    .with_field_path("FLAGR_URL")
                    .with_source("remote_config"),
            )
        })?;
        let transport_config = ClientConfig {
            base_url: None,
            ..config.clone()
        };
        let client = HttpClient::builder()
            .config(transport_config)
            .base_url(flagr_url)
            .build()?;
        Ok(Self::new(Arc::new(client), config.flagr_flag_id).with_cache_ttl(config.config_cache_ttl))
    }

    /// Entity attributes sent with each evaluation (e.g. region codes).
    pub fn with_entity_context(mut self, context: Map<String, Value>) -> Self {
        self.entity_context = context;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    async fn evaluate(&self) -> Result<Option<RemoteClientConfig>> {
        let request = RequestDescriptor::post("/evaluation").json(json!({
            "flagID": self.flag_id,
            "entityContext": self.entity_context,
        }));
        let response = self.client.execute(request).await?;
        Ok(response
            .data
            .get("variantAttachment")
            .cloned()
            .and_then(RemoteClientConfig::from_value))
    }
}

#[async_trait]
impl ConfigSource for FlagrSource {
    async fn from_cache(&self) -> Option<RemoteClientConfig> {
        let cached = self.cached.load_full()?;
        if cached.expires_at <= Instant::now() {
            return None;
        }
        Some(cached.config.clone())
    }

    async fn from_remote(&self) -> Option<RemoteClientConfig> {
        let config = match self.evaluate().await {
            Ok(config) => config,
            Err(e) => {
                warn!(flag_id = self.flag_id, error = %e, "flagr evaluation failed");
                None
            }
        }?;

        self.cached.store(Some(Arc::new(CachedConfig {
            config: config.clone(),
            expires_at: Instant::now() + self.cache_ttl,
        })));
        debug!(flag_id = self.flag_id, "fetched api client config from flagr");
        Some(config)
    }

    fn name(&self) -> &'static str {
        "flagr"
    }
}
