//! Instance resolution: which client executes a call, and with which descriptor.
//!
//! Precedence, first match wins:
//! 1. a mock context runs on the mock's wrapped instance
//! 2. an instance context runs on that instance
//! 3. otherwise the default instance runs, with override keys deep-merged
//!    onto the descriptor when the context carries them
//! 4. with no default instance the call fails with a configuration error

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::client::context::CallContext;
use crate::client::instance::ClientInstance;
use crate::request::RequestDescriptor;
use crate::utils::deep_merge;
use crate::{Error, ErrorContext, Result};

/// Where the executing instance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSource {
    Mock,
    Context,
    Default,
}

/// Outcome of [`resolve`].
#[derive(Clone)]
pub struct Resolution {
    pub instance: Arc<dyn ClientInstance>,
    pub request: RequestDescriptor,
    pub source: InstanceSource,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("request", &self.request)
            .field("source", &self.source)
            .finish()
    }
}

pub fn resolve(
    context: &CallContext,
    request: RequestDescriptor,
    default_instance: Option<&Arc<dyn ClientInstance>>,
) -> Result<Resolution> {
    match context {
        CallContext::Mock(mock) => Ok(Resolution {
            instance: mock.instance(),
            request,
            source: InstanceSource::Mock,
        }),
        CallContext::Instance(instance) => Ok(Resolution {
            instance: instance.clone(),
            request,
            source: InstanceSource::Context,
        }),
        _ => {
            let instance = default_instance.cloned().ok_or_else(|| {
                Error::configuration_with_context(
                    "default API client instance must be provided",
                    ErrorContext::new().with_source("resolver"),
                )
            })?;
            let request = match context {
                CallContext::Override(overrides) => apply_overrides(request, overrides)?,
                _ => request,
            };
            Ok(Resolution {
                instance,
                request,
                source: InstanceSource::Default,
            })
        }
    }
}

fn apply_overrides(
    request: RequestDescriptor,
    overrides: &serde_json::Map<String, Value>,
) -> Result<RequestDescriptor> {
    let mut merged = request.to_value()?;
    deep_merge(&mut merged, &Value::Object(overrides.clone()));
    let request: RequestDescriptor = serde_json::from_value(merged).map_err(|e| {
        Error::validation_with_context(
            "override configuration does not describe a valid request",
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("resolver"),
        )
    })?;
    if !request.extra.is_empty() {
        debug!(keys = ?request.extra.keys().collect::<Vec<_>>(), "request carries unmodelled keys");
    }
    Ok(request)
}
