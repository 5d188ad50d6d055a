//! Connector trait and the LearnUpon tap
//!
//! Defines the core Connector trait (`spec`, `check`, `discover`, `read`)
//! and [`LearnUponTap`], which implements it over the stream registry and
//! the unified stream.

use crate::config::TapConfig;
use crate::engine::Message;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::streams::learnupon::{self, LEARNING_PATHS};
use crate::streams::{RecordStream, StreamRegistry};
use crate::types::JsonValue;
use crate::unify::Unifier;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Connector Spec
// ============================================================================

/// Connector specification returned by spec()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Connector name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Connector version
    pub version: String,

    /// Description
    pub description: Option<String>,

    /// JSON Schema of the configuration
    pub connection_specification: JsonValue,
}

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Streams offered by the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,

    /// JSON Schema of the records
    pub schema: JsonValue,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Whether the stream will be read
    #[serde(default)]
    pub selected: bool,

    /// Parent stream of a child stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stream: Option<String>,

    /// Source streams of a synthetic stream
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_streams: Vec<String>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Look up an entry
    pub fn get(&self, stream: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|e| e.stream == stream)
    }

    /// Names of selected streams in catalog order
    pub fn selected(&self) -> Vec<String> {
        self.streams
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.stream.clone())
            .collect()
    }
}

// ============================================================================
// Stream Selection
// ============================================================================

/// Which streams a read covers
#[derive(Debug, Clone, Default)]
pub enum StreamSelection {
    /// Streams selected by default
    #[default]
    Default,
    /// Explicit stream names
    Names(Vec<String>),
    /// Streams marked `selected` in a catalog
    Catalog(Catalog),
}

impl StreamSelection {
    /// Parse a comma separated list; blank input means the default selection
    pub fn parse_names(list: &str) -> Self {
        let names: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if names.is_empty() {
            Self::Default
        } else {
            Self::Names(names)
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Type alias for the message stream returned by read()
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<Message>> + Send>>;

/// Core trait that all connectors implement
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector specification
    fn spec(&self) -> ConnectorSpec;

    /// Tests if credentials and configuration are valid
    async fn check(&self) -> Result<CheckResult>;

    /// Lists available streams
    async fn discover(&self) -> Result<Catalog>;

    /// Reads the selected streams
    ///
    /// Returns a stream of SCHEMA then RECORD messages per stream. Unknown
    /// stream names fail before anything is fetched.
    async fn read(&self, selection: &StreamSelection) -> Result<MessageStream>;
}

// ============================================================================
// LearnUpon Tap
// ============================================================================

/// The LearnUpon connector
#[derive(Debug, Clone)]
pub struct LearnUponTap {
    registry: StreamRegistry,
    unifier: Unifier,
}

impl LearnUponTap {
    /// Create a tap from validated configuration
    pub fn new(config: &TapConfig) -> Result<Self> {
        config.validate()?;
        let client = Arc::new(config.build_client()?);
        Ok(Self::with_client(client))
    }

    /// Create a tap over an existing client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            registry: learnupon::registry(client),
            unifier: Unifier::default(),
        }
    }

    /// Specification of this connector; needs no configuration
    pub fn connector_spec() -> ConnectorSpec {
        ConnectorSpec {
            name: "tap-learnupon".to_string(),
            title: "LearnUpon".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: Some(
                "Extracts learning paths, courses and course modules from the LearnUpon API"
                    .to_string(),
            ),
            connection_specification: TapConfig::json_schema(),
        }
    }

    /// The REST stream registry
    pub fn registry(&self) -> &StreamRegistry {
        &self.registry
    }

    /// The unified stream
    pub fn unifier(&self) -> &Unifier {
        &self.unifier
    }

    /// All stream names, unified last
    pub fn stream_names(&self) -> Vec<String> {
        self.registry
            .names()
            .map(String::from)
            .chain(std::iter::once(self.unifier.name.clone()))
            .collect()
    }

    /// Full catalog with default selection flags
    pub fn catalog(&self) -> Catalog {
        let mut streams: Vec<CatalogEntry> = self
            .registry
            .descriptors()
            .map(|d| CatalogEntry {
                stream: d.name.clone(),
                schema: d.schema.to_json_schema(),
                key_properties: d.primary_keys.clone(),
                selected: d.selected_by_default,
                parent_stream: d.parent_stream().map(String::from),
                source_streams: Vec::new(),
            })
            .collect();

        streams.push(CatalogEntry {
            stream: self.unifier.name.clone(),
            schema: self.unifier.schema.to_json_schema(),
            key_properties: self.unifier.primary_keys.clone(),
            selected: self.unifier.selected_by_default,
            parent_stream: None,
            source_streams: self.unifier.sources.clone(),
        });

        Catalog { streams }
    }

    /// Resolve a selection to stream names, rejecting unknown names
    pub fn resolve_selection(&self, selection: &StreamSelection) -> Result<Vec<String>> {
        let names = match selection {
            StreamSelection::Default => self
                .catalog()
                .streams
                .into_iter()
                .filter(|e| e.selected)
                .map(|e| e.stream)
                .collect(),
            StreamSelection::Names(names) => names.clone(),
            StreamSelection::Catalog(catalog) => catalog.selected(),
        };

        let known = self.stream_names();
        let mut resolved: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !known.contains(&name) {
                return Err(Error::stream_not_found(name));
            }
            if resolved.contains(&name) {
                warn!(stream = %name, "Stream selected twice, reading it once");
                continue;
            }
            resolved.push(name);
        }
        Ok(resolved)
    }

    /// SCHEMA message for a stream
    fn schema_message(&self, name: &str) -> Result<Message> {
        if name == self.unifier.name {
            return Ok(Message::schema(
                name,
                self.unifier.schema.to_json_schema(),
                self.unifier.primary_keys.clone(),
            ));
        }

        let stream = self
            .registry
            .get(name)
            .ok_or_else(|| Error::stream_not_found(name))?;
        let descriptor = stream.descriptor();
        Ok(Message::schema(
            name,
            descriptor.schema.to_json_schema(),
            descriptor.primary_keys.clone(),
        ))
    }

    /// Record stream for a REST or unified stream
    fn record_stream(&self, name: &str) -> Result<RecordStream> {
        if name == self.unifier.name {
            self.unifier.records(&self.registry)
        } else {
            self.registry.records(name)
        }
    }
}

#[async_trait]
impl Connector for LearnUponTap {
    fn spec(&self) -> ConnectorSpec {
        Self::connector_spec()
    }

    async fn check(&self) -> Result<CheckResult> {
        let stream = self
            .registry
            .get(LEARNING_PATHS)
            .ok_or_else(|| Error::stream_not_found(LEARNING_PATHS))?;

        match stream.fetch_page(None, None).await {
            Ok(page) => {
                info!(records = page.records.len(), "Connection check succeeded");
                Ok(CheckResult::success())
            }
            Err(e) => {
                warn!(error = %e, "Connection check failed");
                Ok(CheckResult::failure(e.to_string()))
            }
        }
    }

    async fn discover(&self) -> Result<Catalog> {
        Ok(self.catalog())
    }

    async fn read(&self, selection: &StreamSelection) -> Result<MessageStream> {
        let names = self.resolve_selection(selection)?;

        let mut parts = Vec::with_capacity(names.len());
        for name in names {
            let schema = self.schema_message(&name)?;
            let records = self.record_stream(&name)?;
            parts.push((name, schema, records));
        }

        Ok(Box::pin(
            stream::iter(parts).flat_map(|(name, schema, records)| {
                stream::once(async move { Ok(schema) })
                    .chain(records.map_ok(move |record| Message::record(name.clone(), record)))
            }),
        ))
    }
}
