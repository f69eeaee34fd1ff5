//! Middleware chain: named interceptors composed in registration order
//! around the action-invocation continuation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::info;

use crate::error::BrokerError;

/// A single named operation dispatched by the host framework
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub params: Option<Value>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: None }
    }

    pub fn with_params(name: impl Into<String>, params: Value) -> Self {
        Self { name: name.into(), params: Some(params) }
    }
}

/// Outcome of one action invocation
pub type ActionResult = Result<Value, BrokerError>;

/// Boxed future produced by handlers and middleware
pub type ActionFuture = BoxFuture<'static, ActionResult>;

/// The continuation handed to each middleware: calling it runs the rest of
/// the chain down to the actual handler.
pub type Next = Arc<dyn Fn(Action) -> ActionFuture + Send + Sync>;

/// Interceptor body: receives the continuation and the action, and must
/// call `next(action)` to continue the chain.
pub type MiddlewareFn = Arc<dyn Fn(Next, Action) -> ActionFuture + Send + Sync>;

/// Wraps a plain async closure into a terminal [`Next`] handler.
pub fn handler_fn<F, Fut>(handler: F) -> Next
where
    F: Fn(Action) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    Arc::new(move |action| Box::pin(handler(action)))
}

/// A named middleware; the name is used for registration diagnostics only.
#[derive(Clone)]
pub struct MiddlewareDescriptor {
    name: &'static str,
    func: MiddlewareFn,
}

impl MiddlewareDescriptor {
    pub fn new(name: &'static str, func: MiddlewareFn) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for MiddlewareDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareDescriptor").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Ordered list of registered middleware.
///
/// Registration never invokes an action; composition folds the list so the
/// first registered middleware is outermost at dispatch time.
#[derive(Debug, Default)]
pub struct MiddlewareChain {
    entries: Vec<MiddlewareDescriptor>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one middleware, preserving registration order.
    pub fn register(&mut self, descriptor: MiddlewareDescriptor) {
        info!(middleware = descriptor.name(), "middleware registered");
        self.entries.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(MiddlewareDescriptor::name).collect()
    }

    /// Wraps `handler` with every registered middleware, first registered
    /// outermost, and returns the composed continuation.
    pub fn compose(&self, handler: Next) -> Next {
        self.entries.iter().rev().fold(handler, |next, entry| {
            let func = Arc::clone(&entry.func);
            let wrapped: Next = Arc::new(move |action| func(Arc::clone(&next), action));
            wrapped
        })
    }
}
