//! Execution engine module
//!
//! Drains a connector's message stream and writes it out.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Writes messages as JSON lines and collects statistics
//! - `SyncConfig` - Configuration for sync operations
//! - Message types for output (Schema, Record, Log)
//!
//! The first error in the stream ends the run; everything written before it
//! stays written.

mod types;

pub use types::{LogLevel, Message, SyncConfig, SyncStats};

use crate::connector::MessageStream;
use crate::error::Result;
use futures::TryStreamExt;
use std::io::Write;
use std::time::Instant;
use tracing::info;

/// Sync engine writing messages to an output
pub struct SyncEngine<W: Write> {
    /// Output sink
    writer: W,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl<W: Write> SyncEngine<W> {
    /// Create a new sync engine
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Consume the engine, returning the writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Drain the message stream
    ///
    /// Stops at the first error or once the record limit is reached.
    pub async fn run(&mut self, mut messages: MessageStream) -> Result<SyncStats> {
        let start = Instant::now();
        let result = self.drain(&mut messages).await;

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        self.writer.flush()?;
        result?;

        info!(
            records = self.stats.records_synced,
            streams = self.stats.streams_synced,
            duration_ms = self.stats.duration_ms,
            "Sync completed"
        );
        Ok(self.stats.clone())
    }

    async fn drain(&mut self, messages: &mut MessageStream) -> Result<()> {
        let mut current: Option<String> = None;

        while let Some(message) = messages.try_next().await? {
            if let Message::Schema { stream, .. } = &message {
                if let Some(previous) = current.replace(stream.clone()) {
                    self.log_stream_done(&previous);
                }
                info!(stream = %stream, "Starting sync for stream");
                self.stats.add_stream(stream);
            }

            if let Message::Record { stream, .. } = &message {
                self.stats.add_record(stream);
            }

            self.write(&message)?;

            if self.limit_reached() {
                info!(max_records = self.config.max_records, "Record limit reached");
                self.stats.truncated = true;
                break;
            }
        }

        if let Some(last) = current {
            self.log_stream_done(&last);
        }
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.config.max_records > 0 && self.stats.records_synced >= self.config.max_records
    }

    fn log_stream_done(&self, stream: &str) {
        let records = self
            .stats
            .records_per_stream
            .get(stream)
            .copied()
            .unwrap_or_default();
        info!(stream = %stream, records, "Finished sync for stream");
    }

    /// Write one message
    pub fn write(&mut self, message: &Message) -> Result<()> {
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut self.writer, message)?;
        } else {
            serde_json::to_writer(&mut self.writer, message)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
