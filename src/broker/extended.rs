//! Extended broker layer: adds schema validation to the base toggles.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::broker::chain::{Action, ActionResult, MiddlewareDescriptor, Next};
use crate::broker::ActionBroker;
use crate::config::{ExtendedBrokerOptions, ValidationSettings};
use crate::middleware::validation_middleware;
use crate::validation::{JsonSchemaValidator, Validator};

/// One named action of a service: an optional params type descriptor
/// (a sample value describing the expected shape) and the handler.
#[derive(Clone)]
pub struct ActionDefinition {
    pub params: Option<Value>,
    pub handler: Next,
}

impl ActionDefinition {
    pub fn new(handler: Next) -> Self {
        Self { params: None, handler }
    }

    pub fn with_params(params: Value, handler: Next) -> Self {
        Self { params: Some(params), handler }
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition").field("params", &self.params).finish_non_exhaustive()
    }
}

/// A named map of actions, as handed to [`ExtendedBroker::create_service`]
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub name: String,
    pub actions: BTreeMap<String, ActionDefinition>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), actions: BTreeMap::new() }
    }

    pub fn action(mut self, name: impl Into<String>, definition: ActionDefinition) -> Self {
        self.actions.insert(name.into(), definition);
        self
    }
}

/// Broker layer with schema validation on top of the base toggles.
///
/// When `validation.enabled` is set, one validation middleware is
/// registered at construction; `strict` (default true) decides whether
/// invalid params abort the call.
pub struct ExtendedBroker {
    broker: ActionBroker,
    validator: Arc<dyn Validator>,
    validation: ValidationSettings,
}

impl ExtendedBroker {
    /// Constructs the broker with the default schema-less validator.
    ///
    /// The default validator carries no contract, so enabling validation
    /// through `options` alone registers the middleware but treats every
    /// payload as conforming — even in strict mode. Supply a
    /// schema-bearing validator via [`Self::with_validator`] to enforce a
    /// params contract.
    pub fn new(options: ExtendedBrokerOptions) -> Self {
        Self::with_validator(options, Arc::new(JsonSchemaValidator::new()))
    }

    /// Constructs the broker with a caller-supplied validator (the
    /// production schema-bearing one, or a test double).
    pub fn with_validator(options: ExtendedBrokerOptions, validator: Arc<dyn Validator>) -> Self {
        let mut broker = ActionBroker::new(options.base);
        let validation = options.validation;

        if validation.enabled {
            broker.use_middleware(validation_middleware(
                Arc::clone(&validator),
                validation.to_options(),
            ));
        }

        Self { broker, validator, validation }
    }

    pub fn broker(&self) -> &ActionBroker {
        &self.broker
    }

    pub fn validation(&self) -> &ValidationSettings {
        &self.validation
    }

    pub fn use_middleware(&mut self, descriptor: MiddlewareDescriptor) {
        self.broker.use_middleware(descriptor);
    }

    pub async fn dispatch(&self, action: Action, handler: Next) -> ActionResult {
        self.broker.dispatch(action, handler).await
    }

    /// Schema string for the action's params, or an empty string when the
    /// action has no params or generation fails. Failures are logged,
    /// never propagated.
    pub fn get_validation_docs(&self, definition: &ActionDefinition) -> String {
        let Some(params) = &definition.params else {
            return String::new();
        };

        match self.validator.generate_schema(params) {
            Ok(schema) => schema,
            Err(err) => {
                error!(error = %err, "failed to generate validation docs");
                String::new()
            }
        }
    }

    /// Registers a service. When validation is enabled, eagerly generates
    /// and logs the schema of every params-carrying action (a
    /// registration-time side effect only), then returns the descriptor
    /// unchanged.
    pub fn create_service(&self, service: ServiceDescriptor) -> ServiceDescriptor {
        if self.validation.enabled {
            for (action_name, definition) in &service.actions {
                if definition.params.is_some() {
                    let schema = self.get_validation_docs(definition);
                    debug!(
                        service = %service.name,
                        action = %action_name,
                        schema = %schema,
                        "registered validation schema"
                    );
                }
            }
        }

        service
    }
}

impl fmt::Debug for ExtendedBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedBroker")
            .field("broker", &self.broker)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::broker::chain::handler_fn;
    use crate::config::ValidationSettings;

    fn noop_handler() -> Next {
        handler_fn(|_action| async { Ok(json!(null)) })
    }

    fn validation_enabled() -> ExtendedBrokerOptions {
        ExtendedBrokerOptions {
            validation: ValidationSettings { enabled: true, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn enabling_validation_registers_exactly_one_middleware() {
        let broker = ExtendedBroker::new(validation_enabled());
        assert_eq!(broker.broker().middleware_names(), ["SchemaValidation"]);
    }

    #[tokio::test]
    async fn default_validator_accepts_everything_until_a_contract_is_supplied() {
        let broker = ExtendedBroker::new(validation_enabled());
        assert!(broker.validation().strict);

        let handler = handler_fn(|_action| async { Ok(json!("handled")) });
        let result = broker
            .dispatch(Action::with_params("user.create", json!({"id": "not-a-number"})), handler)
            .await
            .unwrap();

        assert_eq!(result, json!("handled"));
    }

    #[test]
    fn disabled_validation_registers_nothing() {
        let broker = ExtendedBroker::new(ExtendedBrokerOptions::default());
        assert_eq!(broker.broker().middleware_count(), 0);
    }

    #[test]
    fn validation_docs_for_a_params_action() {
        let broker = ExtendedBroker::new(validation_enabled());
        let definition = ActionDefinition::with_params(json!({"id": 1}), noop_handler());

        let docs = broker.get_validation_docs(&definition);
        let parsed: Value = serde_json::from_str(&docs).unwrap();
        assert_eq!(parsed["properties"]["id"]["type"], "number");
    }

    #[test]
    fn validation_docs_swallow_generation_failures() {
        let broker = ExtendedBroker::new(validation_enabled());
        // Heterogeneous array: the one shape schema inference rejects.
        let definition = ActionDefinition::with_params(json!([1, "two"]), noop_handler());

        assert_eq!(broker.get_validation_docs(&definition), "");
    }

    #[test]
    fn param_less_actions_have_no_docs() {
        let broker = ExtendedBroker::new(validation_enabled());
        assert_eq!(broker.get_validation_docs(&ActionDefinition::new(noop_handler())), "");
    }

    #[test]
    fn create_service_returns_the_descriptor_unchanged() {
        let broker = ExtendedBroker::new(validation_enabled());

        let service = ServiceDescriptor::new("users")
            .action("create", ActionDefinition::with_params(json!({"id": 1}), noop_handler()))
            .action("list", ActionDefinition::new(noop_handler()));

        let created = broker.create_service(service);
        assert_eq!(created.name, "users");
        assert_eq!(created.actions.len(), 2);
        assert_eq!(created.actions["create"].params, Some(json!({"id": 1})));
        assert_eq!(created.actions["list"].params, None);
    }
}
