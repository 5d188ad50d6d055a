//! Stream registry and parent fan-out

use super::descriptor::StreamDescriptor;
use super::rest::{RecordStream, RestStream};
use crate::error::{Error, Result};
use futures::future;
use futures::stream::TryStreamExt;
use tracing::debug;

/// Named REST streams in declaration order
#[derive(Debug, Clone, Default)]
pub struct StreamRegistry {
    streams: Vec<RestStream>,
}

impl StreamRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream, replacing any stream of the same name
    pub fn register(&mut self, stream: RestStream) {
        match self.streams.iter_mut().find(|s| s.name() == stream.name()) {
            Some(existing) => *existing = stream,
            None => self.streams.push(stream),
        }
    }

    /// Builder-style [`register`](Self::register)
    #[must_use]
    pub fn with_stream(mut self, stream: RestStream) -> Self {
        self.register(stream);
        self
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&RestStream> {
        self.streams.iter().find(|s| s.name() == name)
    }

    /// Check if a stream is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered stream names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.streams.iter().map(RestStream::name)
    }

    /// Registered descriptors
    pub fn descriptors(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter().map(RestStream::descriptor)
    }

    /// Records of a stream, running one child loop per parent record
    ///
    /// Parent records are fetched lazily: the child loop for a parent record
    /// runs to completion before the next parent record is pulled.
    pub fn records(&self, name: &str) -> Result<RecordStream> {
        self.records_with_lineage(name, &mut Vec::new())
    }

    fn records_with_lineage(&self, name: &str, lineage: &mut Vec<String>) -> Result<RecordStream> {
        if lineage.iter().any(|seen| seen == name) {
            lineage.push(name.to_string());
            return Err(Error::config(format!(
                "Cyclic parent streams: {}",
                lineage.join(" -> ")
            )));
        }
        lineage.push(name.to_string());

        let stream = self
            .get(name)
            .ok_or_else(|| Error::stream_not_found(name))?
            .clone();

        let Some(link) = stream.descriptor().parent.clone() else {
            return Ok(stream.records(None));
        };

        let parent = self.records_with_lineage(&link.stream, lineage)?;
        debug!(stream = %name, parent = %link.stream, "Fanning out over parent records");

        Ok(Box::pin(
            parent
                .and_then(move |record| future::ready(link.child_context(&record)))
                .map_ok(move |context| stream.records(Some(context)))
                .try_flatten(),
        ))
    }
}
