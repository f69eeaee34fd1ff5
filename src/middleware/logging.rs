//! Enhanced logging middleware: one structured "started" event per
//! invocation, then either "completed" or "failed". Failures are observed
//! and re-raised unchanged.

use std::sync::Arc;

use tracing::{error, info};

use crate::broker::chain::{Action, MiddlewareDescriptor, MiddlewareFn, Next};

pub fn enhanced_logging_middleware() -> MiddlewareDescriptor {
    let func: MiddlewareFn = Arc::new(|next: Next, action: Action| {
        Box::pin(async move {
            info!(action = %action.name, params = ?action.params, "action started");
            let action_name = action.name.clone();

            match next(action).await {
                Ok(result) => {
                    info!(action = %action_name, result = ?result, "action completed");
                    Ok(result)
                }
                Err(err) => {
                    error!(
                        action = %action_name,
                        error = %err,
                        error_type = err.error_type(),
                        "action failed"
                    );
                    Err(err)
                }
            }
        })
    });

    MiddlewareDescriptor::new("EnhancedLogging", func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::broker::chain::{handler_fn, MiddlewareChain};
    use crate::error::BrokerError;

    #[test]
    fn descriptor_is_named_for_diagnostics() {
        assert_eq!(enhanced_logging_middleware().name(), "EnhancedLogging");
    }

    #[tokio::test]
    async fn success_and_failure_both_pass_through_unchanged() {
        let mut chain = MiddlewareChain::new();
        chain.register(enhanced_logging_middleware());

        let ok_handler = handler_fn(|_action| async { Ok(json!(7)) });
        let result = chain.compose(ok_handler)(Action::new("math.add")).await.unwrap();
        assert_eq!(result, json!(7));

        let err_handler = handler_fn(|_action| async { Err(BrokerError::handler("overflow")) });
        let error = chain.compose(err_handler)(Action::new("math.add")).await.unwrap_err();
        assert_eq!(error.to_string(), "overflow");
    }
}
