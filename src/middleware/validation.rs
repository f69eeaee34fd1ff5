//! Params validation middleware.
//!
//! When the action carries parameters, a root [`ValidationContext`] is
//! built over them and the configured validator is run. An invalid context
//! in strict mode becomes an aggregated [`BrokerError::Validation`]; in
//! non-strict mode (or for param-less actions) the chain continues
//! regardless.

use std::sync::Arc;

use crate::broker::chain::{Action, MiddlewareDescriptor, MiddlewareFn, Next};
use crate::error::BrokerError;
use crate::validation::{ValidationContext, ValidationOptions, Validator};

pub fn validation_middleware(
    validator: Arc<dyn Validator>,
    options: ValidationOptions,
) -> MiddlewareDescriptor {
    let func: MiddlewareFn = Arc::new(move |next: Next, action: Action| {
        let validator = Arc::clone(&validator);
        let options = options.clone();
        Box::pin(async move {
            if let Some(params) = action.params.clone() {
                let mut context =
                    ValidationContext::root(vec!["params".to_string()], params, options.clone());

                let valid = validator.validate_with_context(&mut context);
                if !valid && options.strict {
                    return Err(BrokerError::Validation(context.errors));
                }
            }

            next(action).await
        })
    });

    MiddlewareDescriptor::new("SchemaValidation", func)
}
