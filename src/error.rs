use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single structural diagnostic collected during validation.
///
/// The `path` field is stamped with the joined context path at the moment
/// the record is added to a [`crate::validation::ValidationContext`]; it is
/// not re-derived later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Human-readable description of the failure
    pub message: String,
    /// Stable machine-readable code (e.g. `VALIDATION_ERROR`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Error classification tag (e.g. `ValidationError`)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Arbitrary diagnostic payload (offending value, engine detail)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Captured stack/backtrace text, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Joined location of the offending value inside the root document
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            kind: None,
            data: None,
            stack: None,
            path: String::new(),
        }
    }

    /// Shorthand for the record shape emitted by validators
    pub fn validation(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            message: message.into(),
            code: Some("VALIDATION_ERROR".to_string()),
            kind: Some("ValidationError".to_string()),
            data,
            stack: None,
            path: String::new(),
        }
    }
}

/// Failures surfaced by the broker extension layers.
///
/// Handler failures travel through the middleware chain as
/// [`BrokerError::Handler`] values and must reach the dispatcher unchanged;
/// middleware only observe them in passing.
#[derive(Error, Debug)]
pub enum BrokerError {
    /// The expected shape could not be introspected into a schema
    #[error("Schema generation failed: {message}")]
    SchemaGeneration {
        message: String,
        /// Originating cause, carried as diagnostic data
        data: Option<Value>,
    },

    /// A previously generated schema could not be parsed or built
    #[error("Schema compilation failed: {message}")]
    SchemaCompilation { message: String, data: Option<Value> },

    /// Strict-mode rejection aggregating every record collected in the context
    #[error("Validation failed: {}", serialize_records(.0))]
    Validation(Vec<ErrorRecord>),

    /// Opaque failure raised by the wrapped action handler
    #[error("{message}")]
    Handler { message: String, data: Option<Value> },
}

impl BrokerError {
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler { message: message.into(), data: None }
    }

    /// Error classification for logging and metrics labels
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::SchemaGeneration { .. } => "schema_generation",
            Self::SchemaCompilation { .. } => "schema_compilation",
            Self::Validation(_) => "validation",
            Self::Handler { .. } => "handler",
        }
    }

    /// Records carried by a validation rejection, if this is one
    pub fn validation_records(&self) -> Option<&[ErrorRecord]> {
        match self {
            Self::Validation(records) => Some(records),
            _ => None,
        }
    }
}

fn serialize_records(records: &[ErrorRecord]) -> String {
    serde_json::to_string(records).unwrap_or_else(|_| format!("{records:?}"))
}
