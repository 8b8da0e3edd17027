//! Domain API functions.
//!
//! Each function builds a [`crate::RequestDescriptor`] and hands it to
//! [`crate::ApiClient::request`] together with the caller's context.

mod example;

pub use example::ExampleApi;
