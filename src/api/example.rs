use std::future::Future;

use crate::client::{ApiClient, CallContext};
use crate::request::{RequestDescriptor, Response};
use crate::Result;

pub trait ExampleApi {
    /// `GET /something`.
    fn get_something(&self, context: &CallContext) -> impl Future<Output = Result<Response>> + Send;

    /// `GET /another-thing?param1=..&param2=..`.
    fn get_another_thing(
        &self,
        context: &CallContext,
        param1: &str,
        param2: &str,
    ) -> impl Future<Output = Result<Response>> + Send;
}

impl ExampleApi for ApiClient {
    async fn get_something(&self, context: &CallContext) -> Result<Response> {
        self.request(context, RequestDescriptor::get("/something"))
            .await
    }

    async fn get_another_thing(
        &self,
        context: &CallContext,
        param1: &str,
        param2: &str,
    ) -> Result<Response> {
        let request = RequestDescriptor::get("/another-thing")
            .param("param1", param1)
            .param("param2", param2);
        self.request(context, request).await
    }
}
