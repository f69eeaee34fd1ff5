//! Validation-context propagation and schema enforcement.
//!
//! A [`ValidationContext`] tracks the path, value, and accumulated errors
//! of one validation pass over a nested document; a [`Validator`]
//! generates and compiles schemas and reports structural violations into
//! the context it is handed.

pub mod context;
pub mod json_schema;
pub mod validator;

pub use context::{ErrorHandler, ValidationContext, ValidationOptions};
pub use json_schema::JsonSchemaValidator;
pub use validator::{CompiledSchema, Validator, Violation};
