//! # dynamic-api-client
//!
//! HTTP API client wrapper with pluggable instance resolution and remotely
//! configured base URLs.
//!
//! ## Overview
//!
//! Domain API functions build a [`RequestDescriptor`] and hand it to an
//! [`ApiClient`], which holds the process-wide default instance. Every call also
//! carries a [`CallContext`] that decides which instance actually runs it:
//!
//! | Context | Executing instance | Descriptor |
//! |---------|--------------------|------------|
//! | [`CallContext::Mock`] | the mock's wrapped instance | unchanged |
//! | [`CallContext::Instance`] | the given instance | unchanged |
//! | [`CallContext::Override`] | the default instance | override keys deep-merged |
//! | [`CallContext::None`] | the default instance | unchanged |
//!
//! Without a default instance, the last two fail with [`Error::Configuration`].
//! Transport failures are returned exactly as the instance produced them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynamic_api_client::api::ExampleApi;
//! use dynamic_api_client::{ApiClient, CallContext, HttpClient};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> dynamic_api_client::Result<()> {
//!     let default = HttpClient::builder()
//!         .base_url("https://api.example.com")
//!         .build()?;
//!     let api = ApiClient::new(Arc::new(default));
//!
//!     // Default instance.
//!     let resp = api.get_something(&CallContext::None).await?;
//!     println!("{}", resp.data);
//!
//!     // Same instance, different base URL for this one call.
//!     let ctx = CallContext::overrides(json!({"baseURL": "https://eu.example.com"}));
//!     let resp = api.get_another_thing(&ctx, "a", "b").await?;
//!     println!("{}", resp.data);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client instances, call context, resolver and dispatcher |
//! | [`request`] | Request descriptors and responses |
//! | [`interceptors`] | Request/response hooks attached to an instance |
//! | [`transport`] | reqwest-backed transport and transport errors |
//! | [`mock`] | In-memory mock instance for tests |
//! | [`remote_config`] | Remotely configured base URLs |
//! | [`api`] | Domain API functions |

pub mod api;
pub mod client;
pub mod config;
pub mod interceptors;
pub mod mock;
pub mod prelude;
pub mod remote_config;
pub mod request;
pub mod transport;
pub mod utils;

// Re-export main types for convenience
pub use client::{
    dispatch, resolve, ApiClient, CallContext, ClientDefaults, ClientInstance, HttpClient,
    HttpClientBuilder, InstanceSource, Resolution,
};
pub use config::ClientConfig;
pub use mock::{create_mock, Mock};
pub use request::{Method, RequestDescriptor, Response};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
