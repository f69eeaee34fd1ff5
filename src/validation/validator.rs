use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::BrokerError;
use crate::validation::ValidationContext;

/// Capability set for describing and enforcing structural contracts.
///
/// `generate_schema` and `compile_schema` are pure functions of their
/// input; `validate_with_context` is the only operation with a side effect
/// (reporting into the supplied context) and never raises — it records and
/// returns `false` instead.
pub trait Validator: Send + Sync {
    /// Produces a serializable JSON Schema describing the expected shape
    /// for the given type descriptor (a sample value in this runtime).
    ///
    /// Fails with [`BrokerError::SchemaGeneration`] when the descriptor
    /// cannot be introspected; the error carries the cause as data.
    fn generate_schema(&self, type_descriptor: &Value) -> Result<String, BrokerError>;

    /// Parses a previously generated schema into a reusable predicate.
    ///
    /// Fails with [`BrokerError::SchemaCompilation`] when the schema text
    /// is malformed. The returned predicate itself never raises.
    fn compile_schema(&self, schema: &str) -> Result<CompiledSchema, BrokerError>;

    /// Runs structural validation against `context.value`, recording one
    /// `ValidationError` record per violation through `context.add_error`.
    /// Returns `true` when the value conforms.
    fn validate_with_context(&self, context: &mut ValidationContext) -> bool;
}

/// One structural violation reported by the schema engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer-style location of the offending value
    pub instance_path: String,
    pub message: String,
}

/// A compiled, reusable schema check.
///
/// Wraps the engine's validator so the hot path never re-derives
/// structural rules; `is_valid` reports `false` on any internal failure
/// rather than propagating it.
#[derive(Clone)]
pub struct CompiledSchema {
    validator: Arc<jsonschema::Validator>,
}

impl CompiledSchema {
    pub(crate) fn new(validator: jsonschema::Validator) -> Self {
        Self { validator: Arc::new(validator) }
    }

    /// Whether `data` conforms to the compiled schema. Never raises.
    pub fn is_valid(&self, data: &Value) -> bool {
        self.validator.is_valid(data)
    }

    /// Structured list of every violation for `data`, empty when valid
    pub fn violations(&self, data: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(data)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}
