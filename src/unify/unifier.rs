//! Unifier implementation

use crate::error::Result;
use crate::schema::{PropertyType, Schema};
use crate::streams::learnupon::{COURSES, LEARNING_PATHS, MODULES};
use crate::streams::{RecordStream, StreamRegistry};
use crate::types::{JsonValue, Record};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

/// Name of the unified stream
pub const UNIFIED_STREAM: &str = "unified";

/// Fields of a unified record, in output order
pub const UNIFIED_FIELDS: [(&str, PropertyType); 14] = [
    ("id", PropertyType::Integer),
    ("name", PropertyType::String),
    ("created_at", PropertyType::DateTime),
    ("updated_at", PropertyType::DateTime),
    ("date_published", PropertyType::DateTime),
    ("cataloged", PropertyType::Boolean),
    ("sellable", PropertyType::Boolean),
    ("description_html", PropertyType::String),
    ("description_text", PropertyType::String),
    ("path_length_unit", PropertyType::String),
    ("credits_to_be_awarded", PropertyType::String),
    ("thumbnail_image_url", PropertyType::String),
    ("published_status_id", PropertyType::String),
    ("stream", PropertyType::String),
];

/// Field carrying the source stream name
const STREAM_FIELD: &str = "stream";

/// Schema of unified records
pub fn unified_schema() -> Schema {
    Schema::from_fields(&UNIFIED_FIELDS)
}

/// Project a source record onto the unified shape
///
/// Every unified field starts out null; fields with an identical name are
/// copied over and `stream` is set to the source stream.
pub fn merge(record: &Record, source: &str) -> Record {
    UNIFIED_FIELDS
        .iter()
        .map(|(field, _)| {
            let value = if *field == STREAM_FIELD {
                JsonValue::String(source.to_string())
            } else {
                record.get(*field).cloned().unwrap_or(JsonValue::Null)
            };
            ((*field).to_string(), value)
        })
        .collect()
}

/// Synthetic stream merging several source streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unifier {
    /// Stream name
    pub name: String,
    /// Source stream names, drained in this order
    pub sources: Vec<String>,
    /// Output schema
    pub schema: Schema,
    /// Primary keys of unified records
    pub primary_keys: Vec<String>,
    /// Whether the stream runs when no explicit selection is given
    pub selected_by_default: bool,
}

impl Default for Unifier {
    fn default() -> Self {
        Self::new(UNIFIED_STREAM, [LEARNING_PATHS, COURSES, MODULES])
    }
}

impl Unifier {
    /// Create a unifier over the given sources
    pub fn new<I, S>(name: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            schema: unified_schema(),
            primary_keys: vec![STREAM_FIELD.to_string(), "id".to_string()],
            selected_by_default: true,
        }
    }

    /// Add a source stream
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Unified records from fresh passes over every source
    ///
    /// Unknown sources fail before any request is made.
    pub fn records(&self, registry: &StreamRegistry) -> Result<RecordStream> {
        let sources = self
            .sources
            .iter()
            .map(|source| Ok((source.clone(), registry.records(source)?)))
            .collect::<Result<Vec<_>>>()?;

        debug!(stream = %self.name, sources = ?self.sources, "Unifying source streams");

        Ok(Box::pin(
            stream::iter(sources)
                .map(|(source, records)| records.map_ok(move |record| merge(&record, &source)))
                .flatten(),
        ))
    }
}
