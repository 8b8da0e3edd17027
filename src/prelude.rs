//! Commonly used types; `use dynamic_api_client::prelude::*;`.

pub use crate::api::ExampleApi;
pub use crate::client::{ApiClient, CallContext, ClientInstance, HttpClient};
pub use crate::interceptors::{RequestInterceptor, ResponseInterceptor};
pub use crate::mock::Mock;
pub use crate::request::{Method, RequestDescriptor, Response};
pub use crate::{Error, Result};
