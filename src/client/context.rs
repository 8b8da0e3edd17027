use serde_json::{Map, Value};
use std::sync::Arc;

use crate::client::instance::{ClientInstance, HttpClient};
use crate::mock::Mock;

/// Per-call context deciding which instance runs a request.
#[derive(Clone, Default)]
pub enum CallContext {
    /// Use the default instance as configured.
    #[default]
    None,
    /// Use the default instance with these keys deep-merged onto the descriptor.
    Override(Map<String, Value>),
    /// Use this instance instead of the default.
    Instance(Arc<dyn ClientInstance>),
    /// Route through the mock's wrapped instance.
    Mock(Mock),
}

impl CallContext {
    /// Objects become overrides; any other value means "no context".
    pub fn overrides(value: Value) -> Self {
        match value {
            Value::Object(map) => CallContext::Override(map),
            _ => CallContext::None,
        }
    }

    pub fn instance(instance: Arc<dyn ClientInstance>) -> Self {
        CallContext::Instance(instance)
    }
}

impl From<Mock> for CallContext {
    fn from(mock: Mock) -> Self {
        CallContext::Mock(mock)
    }
}

impl From<Arc<HttpClient>> for CallContext {
    fn from(client: Arc<HttpClient>) -> Self {
        CallContext::Instance(client)
    }
}

impl From<Map<String, Value>> for CallContext {
    fn from(map: Map<String, Value>) -> Self {
        CallContext::Override(map)
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallContext::None => f.write_str("None"),
            CallContext::Override(map) => f.debug_tuple("Override").field(map).finish(),
            CallContext::Instance(instance) => f
                .debug_tuple("Instance")
                .field(instance.defaults())
                .finish(),
            CallContext::Mock(mock) => f.debug_tuple("Mock").field(mock).finish(),
        }
    }
}
