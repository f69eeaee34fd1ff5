#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(warnings)]
// Allow some overly strict pedantic lints for middleware code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

//! Broker Extensions
//!
//! Middleware extensions for an action-dispatch broker: metrics
//! collection, enhanced structured logging, and schema-based params
//! validation, wired together at construction time from a configuration
//! object. The broker layers own the middleware chain; actual action
//! dispatch belongs to the host framework.

pub mod broker;
pub mod config;
pub mod error;
pub mod middleware;
pub mod validation;

// Re-export the public surface
pub use broker::{
    handler_fn, Action, ActionBroker, ActionDefinition, ActionFuture, ActionResult,
    ExtendedBroker, MiddlewareChain, MiddlewareDescriptor, MiddlewareFn, Next, ServiceDescriptor,
};
pub use config::{
    init_tracing, BrokerOptions, ExtendedBrokerOptions, FeatureToggle, ValidationSettings,
};
pub use error::{BrokerError, ErrorRecord};
pub use validation::{
    CompiledSchema, ErrorHandler, JsonSchemaValidator, ValidationContext, ValidationOptions,
    Validator, Violation,
};
