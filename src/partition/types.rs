//! Parent link types

use crate::error::{Error, Result};
use crate::types::{Context, JsonValue, Record};

/// One `parent_field -> context_key` binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// Field read from the parent record (dotted paths allowed, e.g. `data.id`)
    pub parent_field: String,
    /// Key the value is stored under in the child context
    pub context_key: String,
}

impl KeyBinding {
    /// Create a new binding
    pub fn new(parent_field: impl Into<String>, context_key: impl Into<String>) -> Self {
        Self {
            parent_field: parent_field.into(),
            context_key: context_key.into(),
        }
    }
}

/// Link from a child stream to its parent stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the parent stream
    pub stream: String,
    /// Fields copied from each parent record into the child context
    pub bindings: Vec<KeyBinding>,
}

impl ParentLink {
    /// Create a link with a single binding
    pub fn new(
        stream: impl Into<String>,
        parent_field: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            bindings: vec![KeyBinding::new(parent_field, context_key)],
        }
    }

    /// Add another binding
    #[must_use]
    pub fn with_binding(
        mut self,
        parent_field: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        self.bindings.push(KeyBinding::new(parent_field, context_key));
        self
    }

    /// Build the child context for one parent record
    ///
    /// Fails with [`Error::MissingKey`] when a bound field is absent or null.
    pub fn child_context(&self, parent: &Record) -> Result<Context> {
        let mut context = Context::new();
        for binding in &self.bindings {
            let value = extract_field(parent, &binding.parent_field)
                .filter(|v| !v.is_null())
                .ok_or_else(|| Error::missing_key(&self.stream, &binding.parent_field))?;
            context.insert(binding.context_key.clone(), value.clone());
        }
        Ok(context)
    }
}

/// Look up a possibly nested field such as `id` or `data.id`
pub fn extract_field<'a>(record: &'a Record, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut parts = path.split('.');

    let first = parts.next()?;
    let mut current = record.get(first)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}
