//! Timing/error metrics middleware.
//!
//! Instruments are described once at broker construction and live in the
//! process-wide metrics registry; the per-call macros are lookups into
//! that shared registry, safe under concurrent in-flight invocations.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::broker::chain::{Action, MiddlewareDescriptor, MiddlewareFn, Next};

/// Duration histogram for successful action invocations, labeled by action
pub const ACTION_DURATION_SECONDS: &str = "action_duration_seconds";
/// Error counter for failed action invocations, labeled by action
pub const ACTION_ERRORS_TOTAL: &str = "action_errors_total";

/// Describes the action instruments. Idempotent; called once when a broker
/// is constructed with metrics enabled.
pub fn describe_action_instruments() {
    describe_histogram!(ACTION_DURATION_SECONDS, "Duration of action execution in seconds");
    describe_counter!(ACTION_ERRORS_TOTAL, "Total number of action errors");
    debug!("action metrics initialized");
}

/// Middleware that times each wrapped call.
///
/// Success records exactly one histogram observation; failure increments
/// the error counter instead and re-raises the original error unchanged.
pub fn metrics_middleware() -> MiddlewareDescriptor {
    let func: MiddlewareFn = Arc::new(|next: Next, action: Action| {
        let action_name = action.name.clone();
        Box::pin(async move {
            let start = Instant::now();
            match next(action).await {
                Ok(result) => {
                    histogram!(ACTION_DURATION_SECONDS, "action" => action_name)
                        .record(start.elapsed().as_secs_f64());
                    Ok(result)
                }
                Err(error) => {
                    counter!(ACTION_ERRORS_TOTAL, "action" => action_name).increment(1);
                    Err(error)
                }
            }
        })
    });

    MiddlewareDescriptor::new("Metrics", func)
}

/// Installs the Prometheus recorder as the global metrics backend and
/// returns the render handle for scraping.
pub fn initialize_prometheus_exporter() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder)?;
    Ok(handle)
}
