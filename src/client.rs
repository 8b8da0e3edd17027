//! Client instances and the instance-resolution core.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod context;
pub mod core;
pub mod dispatch;
pub mod instance;
pub mod resolver;

pub use builder::HttpClientBuilder;
pub use context::CallContext;
pub use self::core::ApiClient;
pub use dispatch::dispatch;
pub use instance::{ClientDefaults, ClientInstance, HttpClient};
pub use resolver::{resolve, InstanceSource, Resolution};
