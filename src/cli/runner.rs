//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::connector::{Catalog, Connector, LearnUponTap, StreamSelection};
use crate::engine::{Message, SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check => self.check().await,
            Commands::Discover => self.discover().await,
            Commands::Read {
                streams,
                catalog,
                max_records,
            } => {
                self.read(streams.as_deref(), catalog.as_deref(), *max_records)
                    .await
            }
        }
    }

    /// Load configuration: inline JSON or file, then environment overrides
    fn load_config(&self) -> Result<TapConfig> {
        let mut config = if let Some(json_str) = &self.cli.config_json {
            TapConfig::from_json_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?
        } else if let Some(path) = &self.cli.config {
            TapConfig::from_file(path)?
        } else {
            TapConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn build_tap(&self) -> Result<LearnUponTap> {
        LearnUponTap::new(&self.load_config()?)
    }

    /// Show spec
    fn spec(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "SPEC",
            "spec": LearnUponTap::connector_spec()
        }));
        Ok(())
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let tap = self.build_tap()?;

        self.output_message(&Message::info("Checking connection to LearnUpon"));

        let result = tap.check().await?;
        let (status, message) = if result.success {
            ("SUCCEEDED", "Connection successful".to_string())
        } else {
            (
                "FAILED",
                format!(
                    "Connection failed: {}",
                    result.message.unwrap_or_default()
                ),
            )
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message
            }
        }));
        Ok(())
    }

    /// Discover streams
    async fn discover(&self) -> Result<()> {
        let tap = self.build_tap()?;
        let catalog = tap.discover().await?;

        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": catalog
        }));
        Ok(())
    }

    /// Read data
    async fn read(
        &self,
        streams: Option<&str>,
        catalog: Option<&Path>,
        max_records: Option<usize>,
    ) -> Result<()> {
        let sync_start = Instant::now();
        let tap = self.build_tap()?;

        let selection = match (streams, catalog) {
            (_, Some(path)) => StreamSelection::Catalog(Catalog::from_file(path)?),
            (Some(list), None) => StreamSelection::parse_names(list),
            (None, None) => StreamSelection::Default,
        };
        let stream_names = tap.resolve_selection(&selection)?;

        let mut sync_config =
            SyncConfig::new().with_pretty(self.cli.format == OutputFormat::Pretty);
        if let Some(max) = max_records {
            sync_config = sync_config.with_max_records(max);
        }

        let messages = tap.read(&selection).await?;
        let mut engine =
            SyncEngine::new(BufWriter::new(std::io::stdout())).with_config(sync_config);
        let result = engine.run(messages).await;
        let stats = engine.stats().clone();
        drop(engine);

        let streams: Vec<Value> = stream_names
            .iter()
            .map(|name| {
                let records = stats
                    .records_per_stream
                    .get(name)
                    .copied()
                    .unwrap_or_default();
                json!({
                    "stream": name,
                    "records_synced": records
                })
            })
            .collect();

        let (status, error) = match &result {
            Ok(_) => ("SUCCEEDED", None),
            Err(e) => ("FAILED", Some(e.to_string())),
        };

        self.output_message(&json!({
            "type": "SYNC_SUMMARY",
            "summary": {
                "status": status,
                "connector": "tap-learnupon",
                "total_records": stats.records_synced,
                "total_streams": stats.streams_synced,
                "truncated": stats.truncated,
                "duration_ms": sync_start.elapsed().as_millis() as u64,
                "error": error,
                "streams": streams
            }
        }));

        result.map(|_| ())
    }

    fn output_message<T: Serialize>(&self, msg: &T) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
