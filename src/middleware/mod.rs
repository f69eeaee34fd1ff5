//! Built-in middleware for the broker extension layers:
//! - Timing/error metrics per action
//! - Structured started/completed/failed logging
//! - Schema-based params validation

pub mod logging;
pub mod metrics;
pub mod validation;

pub use logging::enhanced_logging_middleware;
pub use metrics::{
    describe_action_instruments, initialize_prometheus_exporter, metrics_middleware,
    ACTION_DURATION_SECONDS, ACTION_ERRORS_TOTAL,
};
pub use validation::validation_middleware;
