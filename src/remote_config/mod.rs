//! Remotely configured base URLs.
//!
//! A [`RemoteConfigStore`] keeps the latest [`RemoteClientConfig`] fetched from
//! a [`ConfigSource`] and answers "which base URL should this endpoint use?".
//! [`install`] wires it into a client instance as a request interceptor, so
//! every call routed through that instance picks up the override.
//!
//! Fetch and parse failures never reach callers: they are logged and treated
//! as "no override available".
//!
//! ## Example
//!
//! ```rust,no_run
//! use dynamic_api_client::remote_config::{self, FlagrSource, RemoteConfigStore};
//! use dynamic_api_client::{ApiClient, ClientConfig, HttpClient};
//! use std::sync::Arc;
//!
//! # fn main() -> dynamic_api_client::Result<()> {
//! let config = ClientConfig::from_env();
//! let source = FlagrSource::from_config(&config)?;
//! let store = Arc::new(RemoteConfigStore::new(Arc::new(source), config.min_fetch_interval));
//!
//! let client = remote_config::install(HttpClient::builder().config(config), store).build()?;
//! let api = ApiClient::new(Arc::new(client));
//! # let _ = api;
//! # Ok(())
//! # }
//! ```

mod document;
mod flagr;
mod interceptor;
mod source;
mod store;

pub use document::RemoteClientConfig;
pub use flagr::FlagrSource;
pub use interceptor::RemoteBaseUrlInterceptor;
pub use source::{ConfigSource, StaticSource};
pub use store::RemoteConfigStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::HttpClientBuilder;

/// Narrow capability consumed by the client: an optional base URL per endpoint.
#[async_trait]
pub trait BaseUrlResolver: Send + Sync {
    async fn base_url_for(&self, endpoint: &str) -> Option<String>;
}

/// Register the base-URL interceptor on a client under construction.
pub fn install(builder: HttpClientBuilder, resolver: Arc<dyn BaseUrlResolver>) -> HttpClientBuilder {
    builder.request_interceptor(Arc::new(RemoteBaseUrlInterceptor::new(resolver)))
}
