//! Stream descriptors

use crate::partition::ParentLink;
use crate::schema::Schema;

/// Static description of a REST stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Stream name
    pub name: String,
    /// Endpoint path template relative to the API base, e.g. `/courses/{course_id}/modules`
    pub path: String,
    /// JSON path of the record array in each response body
    pub records_path: String,
    /// Primary key fields
    pub primary_keys: Vec<String>,
    /// Whether the stream runs when no explicit selection is given
    pub selected_by_default: bool,
    /// Parent stream scoping this one, if any
    pub parent: Option<ParentLink>,
    /// Declared record schema
    pub schema: Schema,
}

impl StreamDescriptor {
    /// Create a descriptor with an `id` primary key and records under `$.{name}[*]`
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            records_path: format!("$.{name}[*]"),
            name,
            path: path.into(),
            primary_keys: vec!["id".to_string()],
            selected_by_default: false,
            parent: None,
            schema: Schema::new(),
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = path.into();
        self
    }

    /// Set the primary keys
    #[must_use]
    pub fn with_primary_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as selected by default
    #[must_use]
    pub fn selected_by_default(mut self, selected: bool) -> Self {
        self.selected_by_default = selected;
        self
    }

    /// Set the parent link
    #[must_use]
    pub fn with_parent(mut self, parent: ParentLink) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the schema
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Name of the parent stream, if any
    pub fn parent_stream(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.stream.as_str())
    }
}
