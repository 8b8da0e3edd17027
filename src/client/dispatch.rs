use std::sync::Arc;

use crate::client::context::CallContext;
use crate::client::instance::ClientInstance;
use crate::client::resolver::{resolve, Resolution};
use crate::request::{RequestDescriptor, Response};
use crate::Result;

/// Resolve the executing instance and hand it the (possibly merged) descriptor.
///
/// Resolution failures surface through the returned future, before any
/// transport call; the instance's own result is returned untouched.
pub async fn dispatch(
    context: &CallContext,
    request: RequestDescriptor,
    default_instance: Option<&Arc<dyn ClientInstance>>,
) -> Result<Response> {
    let Resolution {
        instance, request, ..
    } = resolve(context, request, default_instance)?;
    instance.execute(request).await
}
