//! Broker extension layers.
//!
//! [`ActionBroker`] is the base layer: construction-time wiring of the
//! metrics, instance-tracking, and enhanced-logging toggles onto a
//! middleware chain. [`ExtendedBroker`] adds schema validation on top.

pub mod chain;
pub mod extended;

use tracing::info;
use uuid::Uuid;

use crate::config::BrokerOptions;
use crate::middleware::{
    describe_action_instruments, enhanced_logging_middleware, metrics_middleware,
};

pub use chain::{
    handler_fn, Action, ActionFuture, ActionResult, MiddlewareChain, MiddlewareDescriptor,
    MiddlewareFn, Next,
};
pub use extended::{ActionDefinition, ExtendedBroker, ServiceDescriptor};

/// Base broker layer: metrics, instance tracking, and enhanced logging.
///
/// All wiring happens once, synchronously, at construction; each enabled
/// toggle registers exactly one middleware. Actual dispatch is owned by
/// the host framework, which composes the chain via [`ActionBroker::dispatch`].
#[derive(Debug)]
pub struct ActionBroker {
    options: BrokerOptions,
    chain: MiddlewareChain,
}

impl ActionBroker {
    pub fn new(options: BrokerOptions) -> Self {
        let mut broker = Self { options, chain: MiddlewareChain::new() };
        broker.setup_metrics();
        broker.setup_instance_tracking();
        broker.setup_enhanced_logging();
        broker
    }

    fn setup_metrics(&mut self) {
        if self.options.metrics.enabled {
            describe_action_instruments();
            self.chain.register(metrics_middleware());
        }
    }

    fn setup_instance_tracking(&self) {
        // Stub behavior: a one-time identity log line, nothing more.
        if self.options.instance_tracking.enabled {
            info!(instance_id = %Uuid::new_v4(), "instance tracking enabled");
        }
    }

    fn setup_enhanced_logging(&mut self) {
        if self.options.enhanced_logging.enabled {
            self.chain.register(enhanced_logging_middleware());
        }
    }

    /// Registers an additional middleware behind the built-in ones.
    pub fn use_middleware(&mut self, descriptor: MiddlewareDescriptor) {
        self.chain.register(descriptor);
    }

    pub fn options(&self) -> &BrokerOptions {
        &self.options
    }

    pub fn middleware_count(&self) -> usize {
        self.chain.len()
    }

    /// Registered middleware names, in registration (outermost-first) order
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.chain.names()
    }

    /// Runs one action through the full middleware chain down to `handler`.
    pub async fn dispatch(&self, action: Action, handler: Next) -> ActionResult {
        let composed = self.chain.compose(handler);
        composed(action).await
    }
}

impl Default for ActionBroker {
    fn default() -> Self {
        Self::new(BrokerOptions::default())
    }
}
