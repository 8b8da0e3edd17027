//! In-memory mock transport for tests.
//!
//! A [`Mock`] owns a client instance whose transport answers from registered
//! handlers instead of the network. Handlers are checked in registration
//! order; `*_once` handlers are removed after their first match. Requests that
//! match no handler receive a 404.
//!
//! ```rust
//! use dynamic_api_client::{CallContext, HttpClient, Mock};
//! use serde_json::json;
//!
//! # fn main() -> dynamic_api_client::Result<()> {
//! let mock = Mock::new(&HttpClient::builder().build()?);
//! mock.on_get("/something").reply_once(200, json!("RESPONSE"));
//! let context = CallContext::Mock(mock.clone());
//! # let _ = context;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::client::{ClientDefaults, ClientInstance, HttpClient};
use crate::interceptors::Interceptors;
use crate::request::{Method, RequestDescriptor};
use crate::transport::{RawResponse, Transport, TransportError};

#[derive(Debug, Clone, Default)]
struct Matcher {
    method: Option<Method>,
    url: Option<String>,
}

impl Matcher {
    fn matches(&self, request: &RequestDescriptor) -> bool {
        if let Some(method) = self.method {
            if method != request.method {
                return false;
            }
        }
        match &self.url {
            Some(url) => *url == request.url || *url == request.combined_url(),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(RawResponse),
    NetworkError,
    Timeout,
}

#[derive(Debug, Clone)]
struct Handler {
    matcher: Matcher,
    reply: Reply,
    once: bool,
}

#[derive(Default)]
struct MockTransport {
    handlers: Mutex<Vec<Handler>>,
    history: Mutex<Vec<RequestDescriptor>>,
    delay: Mutex<Option<Duration>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread must not poison every later request.
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockTransport {
    fn take_reply(&self, request: &RequestDescriptor) -> Option<Reply> {
        let mut handlers = lock(&self.handlers);
        let idx = handlers.iter().position(|h| h.matcher.matches(request))?;
        if handlers[idx].once {
            Some(handlers.remove(idx).reply)
        } else {
            Some(handlers[idx].reply.clone())
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        lock(&self.history).push(request.clone());
        let reply = self.take_reply(request);

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Reply::Respond(raw)) => Ok(raw),
            Some(Reply::NetworkError) => Err(TransportError::Network {
                request: Box::new(request.clone()),
            }),
            Some(Reply::Timeout) => Err(TransportError::Timeout {
                request: Box::new(request.clone()),
            }),
            None => Ok(RawResponse::new(404, Value::Null)),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Mock-wrapping instance: a client whose requests never leave the process.
#[derive(Clone)]
pub struct Mock {
    client: Arc<HttpClient>,
    transport: Arc<MockTransport>,
}

impl Mock {
    /// Wrap `instance`, keeping its defaults and interceptors.
    pub fn new(instance: &dyn ClientInstance) -> Self {
        Self::with_parts(instance.defaults().clone(), instance.interceptors().clone())
    }

    fn with_parts(defaults: ClientDefaults, interceptors: Interceptors) -> Self {
        let transport = Arc::new(MockTransport::default());
        let client = HttpClient::from_parts(defaults, interceptors, transport.clone());
        Self {
            client: Arc::new(client),
            transport,
        }
    }

    /// Delay every reply, e.g. to exercise concurrent calls.
    pub fn with_delay(self, delay: Duration) -> Self {
        *lock(&self.transport.delay) = Some(delay);
        self
    }

    /// The wrapped client instance.
    pub fn client(&self) -> Arc<HttpClient> {
        self.client.clone()
    }

    pub fn instance(&self) -> Arc<dyn ClientInstance> {
        self.client.clone()
    }

    pub fn on_any(&self) -> MockHandler<'_> {
        self.handler(None, None)
    }

    pub fn on(&self, method: Method, url: impl Into<String>) -> MockHandler<'_> {
        self.handler(Some(method), Some(url.into()))
    }

    pub fn on_get(&self, url: impl Into<String>) -> MockHandler<'_> {
        self.on(Method::Get, url)
    }

    pub fn on_post(&self, url: impl Into<String>) -> MockHandler<'_> {
        self.on(Method::Post, url)
    }

    fn handler(&self, method: Option<Method>, url: Option<String>) -> MockHandler<'_> {
        MockHandler {
            mock: self,
            matcher: Matcher { method, url },
        }
    }

    /// Requests seen so far, in arrival order.
    pub fn history(&self) -> Vec<RequestDescriptor> {
        lock(&self.transport.history).clone()
    }

    /// Drop all handlers and history.
    pub fn reset(&self) {
        lock(&self.transport.handlers).clear();
        self.reset_history();
    }

    pub fn reset_history(&self) {
        lock(&self.transport.history).clear();
    }

    fn push(&self, matcher: Matcher, reply: Reply, once: bool) {
        lock(&self.transport.handlers).push(Handler {
            matcher,
            reply,
            once,
        });
    }
}

impl std::fmt::Debug for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mock")
            .field("client", &self.client)
            .field("handlers", &lock(&self.transport.handlers).len())
            .finish()
    }
}

/// Mock over a fresh instance that copies only `instance`'s defaults.
pub fn create_mock(instance: &dyn ClientInstance) -> Mock {
    Mock::with_parts(instance.defaults().clone(), Interceptors::new())
}

/// Registers the reply for one matcher.
pub struct MockHandler<'a> {
    mock: &'a Mock,
    matcher: Matcher,
}

impl<'a> MockHandler<'a> {
    pub fn reply(self, status: u16, data: Value) -> &'a Mock {
        self.register(Reply::Respond(RawResponse::new(status, data)), false)
    }

    pub fn reply_once(self, status: u16, data: Value) -> &'a Mock {
        self.register(Reply::Respond(RawResponse::new(status, data)), true)
    }

    pub fn reply_with_headers(
        self,
        status: u16,
        data: Value,
        headers: BTreeMap<String, String>,
    ) -> &'a Mock {
        let raw = RawResponse {
            status,
            headers,
            data,
        };
        self.register(Reply::Respond(raw), false)
    }

    pub fn network_error(self) -> &'a Mock {
        self.register(Reply::NetworkError, false)
    }

    pub fn network_error_once(self) -> &'a Mock {
        self.register(Reply::NetworkError, true)
    }

    pub fn timeout(self) -> &'a Mock {
        self.register(Reply::Timeout, false)
    }

    fn register(self, reply: Reply, once: bool) -> &'a Mock {
        self.mock.push(self.matcher, reply, once);
        self.mock
    }
}
