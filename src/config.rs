//! Construction-time configuration for the broker extension layers.
//!
//! All wiring decisions are read once, at construction; there is no
//! dynamic reconfiguration afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{ErrorHandler, ValidationOptions};

/// Single-toggle option block shared by the base-layer features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggle {
    pub enabled: bool,
}

impl FeatureToggle {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }
}

/// Base broker layer options: metrics, instance tracking, enhanced logging.
/// Every toggle defaults to off; an all-default construction registers no
/// middleware and emits no log lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerOptions {
    pub metrics: FeatureToggle,
    pub instance_tracking: FeatureToggle,
    pub enhanced_logging: FeatureToggle,
}

/// Validation layer settings. `strict` defaults to true: once validation
/// is enabled, invalid params abort the call unless explicitly relaxed.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub enabled: bool,
    pub strict: bool,
    /// Callback invoked per collected validation error; not part of the
    /// serializable surface
    #[serde(skip)]
    pub error_handler: Option<ErrorHandler>,
}

impl ValidationSettings {
    /// The per-pass options handed to validation contexts
    pub fn to_options(&self) -> ValidationOptions {
        ValidationOptions { strict: self.strict, error_handler: self.error_handler.clone() }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self { enabled: false, strict: true, error_handler: None }
    }
}

impl fmt::Debug for ValidationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSettings")
            .field("enabled", &self.enabled)
            .field("strict", &self.strict)
            .field("error_handler", &self.error_handler.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Options for the extended broker layer: the base toggles plus validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedBrokerOptions {
    #[serde(flatten)]
    pub base: BrokerOptions,
    pub validation: ValidationSettings,
}

/// Installs the process-wide tracing subscriber: JSON-formatted events,
/// level taken from `RUST_LOG` with an `info` fallback. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}
