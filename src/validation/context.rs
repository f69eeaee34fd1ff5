use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ErrorRecord;

/// Callback invoked once per error as it is added to a context
pub type ErrorHandler = Arc<dyn Fn(&ErrorRecord) + Send + Sync>;

/// Per-pass validation policy, inherited unchanged by child contexts
#[derive(Clone)]
pub struct ValidationOptions {
    /// Whether an invalid value aborts the call instead of merely recording
    pub strict: bool,
    /// Optional per-error callback
    pub error_handler: Option<ErrorHandler>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { strict: true, error_handler: None }
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("strict", &self.strict)
            .field("error_handler", &self.error_handler.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Tree node tracking the value currently being checked, where it lives in
/// the overall document, and where to report failures.
///
/// Contexts are write-once and short-lived: one root per top-level
/// validation call, one child per descent into a nested value, all
/// discarded when the call returns. A child's path is always its parent's
/// path plus exactly one segment, and each context owns an independent
/// error list.
pub struct ValidationContext {
    /// Ordered segments locating `value` inside the root document
    pub path: Vec<String>,
    /// The value currently under examination
    pub value: Value,
    /// Immediately enclosing value, kept only for error reporting
    pub parent: Option<Value>,
    /// Top-level value being validated, shared across the tree
    pub root: Arc<Value>,
    pub options: ValidationOptions,
    /// Accumulated diagnostics; append-only for the context's lifetime
    pub errors: Vec<ErrorRecord>,
}

impl ValidationContext {
    /// Creates the root context for one top-level validation call.
    pub fn root(path: Vec<String>, value: Value, options: ValidationOptions) -> Self {
        let root = Arc::new(value.clone());
        Self { path, value, parent: None, root, options, errors: Vec::new() }
    }

    /// Appends `error` stamped with the current joined path, then invokes
    /// the configured error handler exactly once with the stamped record.
    pub fn add_error(&mut self, error: ErrorRecord) {
        let mut stamped = error;
        stamped.path = self.joined_path();
        self.errors.push(stamped);

        if let Some(handler) = &self.options.error_handler {
            if let Some(added) = self.errors.last() {
                handler(added);
            }
        }
    }

    /// Derives a child context for a nested value one segment deeper.
    /// The parent is not mutated; the child starts with an empty error list.
    pub fn create_child(&self, segment: impl Into<String>, value: Value) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());

        Self {
            path,
            value,
            parent: Some(self.value.clone()),
            root: Arc::clone(&self.root),
            options: self.options.clone(),
            errors: Vec::new(),
        }
    }

    /// Dot-joined form of `path`, as stamped onto added records
    pub fn joined_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("path", &self.path)
            .field("value", &self.value)
            .field("parent", &self.parent)
            .field("options", &self.options)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
