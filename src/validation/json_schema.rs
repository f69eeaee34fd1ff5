//! JSON Schema backed [`Validator`] implementation.
//!
//! The original contract was expressed over compile-time types; here the
//! expected shape is described by a sample value from which a schema is
//! inferred, or supplied directly as a schema at construction time.

use serde_json::{json, Value};

use crate::error::{BrokerError, ErrorRecord};
use crate::validation::{CompiledSchema, ValidationContext, Validator};

/// Validator that enforces a JSON Schema against action parameters.
///
/// Constructed with the params schema it is expected to enforce; a
/// schema-less instance treats every value as conforming, which keeps
/// validation-enabled brokers inert until a contract is supplied.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaValidator {
    compiled: Option<CompiledSchema>,
}

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a validator enforcing `schema`.
    pub fn with_schema(schema: &Value) -> Result<Self, BrokerError> {
        let validator = jsonschema::validator_for(schema).map_err(|e| {
            BrokerError::SchemaCompilation {
                message: "failed to build schema validator".to_string(),
                data: Some(json!(e.to_string())),
            }
        })?;
        Ok(Self { compiled: Some(CompiledSchema::new(validator)) })
    }

    /// Convenience: infer the schema from a sample value, then enforce it.
    pub fn for_sample(sample: &Value) -> Result<Self, BrokerError> {
        let schema = infer_schema(sample).map_err(|cause| BrokerError::SchemaGeneration {
            message: "failed to generate schema".to_string(),
            data: Some(json!(cause)),
        })?;
        Self::with_schema(&schema)
    }
}

impl Validator for JsonSchemaValidator {
    fn generate_schema(&self, type_descriptor: &Value) -> Result<String, BrokerError> {
        let schema = infer_schema(type_descriptor).map_err(|cause| {
            BrokerError::SchemaGeneration {
                message: "failed to generate schema".to_string(),
                data: Some(json!(cause)),
            }
        })?;

        serde_json::to_string_pretty(&schema).map_err(|e| BrokerError::SchemaGeneration {
            message: "failed to serialize generated schema".to_string(),
            data: Some(json!(e.to_string())),
        })
    }

    fn compile_schema(&self, schema: &str) -> Result<CompiledSchema, BrokerError> {
        let parsed: Value =
            serde_json::from_str(schema).map_err(|e| BrokerError::SchemaCompilation {
                message: "failed to parse schema".to_string(),
                data: Some(json!(e.to_string())),
            })?;

        let validator =
            jsonschema::validator_for(&parsed).map_err(|e| BrokerError::SchemaCompilation {
                message: "failed to compile schema".to_string(),
                data: Some(json!(e.to_string())),
            })?;

        Ok(CompiledSchema::new(validator))
    }

    fn validate_with_context(&self, context: &mut ValidationContext) -> bool {
        let Some(compiled) = &self.compiled else {
            return true;
        };

        let violations = compiled.violations(&context.value);
        if violations.is_empty() {
            return true;
        }

        for violation in violations {
            context.add_error(ErrorRecord::validation(
                violation.message,
                Some(json!({
                    "value": context.value,
                    "instancePath": violation.instance_path,
                })),
            ));
        }
        false
    }
}

/// Infers a JSON Schema from a sample value describing the expected shape.
///
/// Objects require every sampled key; arrays take their item schema from
/// the elements, which must all infer to the same schema. A heterogeneous
/// array is the one shape this introspection cannot express, so it is the
/// generation-failure case.
fn infer_schema(sample: &Value) -> Result<Value, String> {
    Ok(match sample {
        Value::Null => json!({}),
        Value::Bool(_) => json!({"type": "boolean"}),
        Value::Number(_) => json!({"type": "number"}),
        Value::String(_) => json!({"type": "string"}),
        Value::Array(items) => {
            let mut item_schema: Option<Value> = None;
            for item in items {
                let inferred = infer_schema(item)?;
                match &item_schema {
                    None => item_schema = Some(inferred),
                    Some(existing) if *existing == inferred => {}
                    Some(existing) => {
                        return Err(format!(
                            "cannot introspect heterogeneous array: {existing} vs {inferred}"
                        ));
                    }
                }
            }
            match item_schema {
                Some(items) => json!({"type": "array", "items": items}),
                None => json!({"type": "array"}),
            }
        }
        Value::Object(fields) => {
            let mut properties = serde_json::Map::new();
            let mut required = Vec::new();
            for (key, field) in fields {
                properties.insert(key.clone(), infer_schema(field)?);
                required.push(Value::String(key.clone()));
            }
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            })
        }
    })
}
