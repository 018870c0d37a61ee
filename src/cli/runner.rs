//! CLI runner - executes commands

use crate::catalog::ObjectKind;
use crate::cli::commands::{Cli, Commands};
use crate::client::LiveAgentClient;
use crate::config::ExtractorConfig;
use crate::engine::{table_for, Extractor, RunConfig, RunStats};
use crate::error::Result;
use crate::VERSION;
use chrono::Utc;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, info};

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
        match self.cli.command {
            Commands::Run => self.extract().await.map(|_| ()),
            Commands::Check => self.check().await,
            Commands::Objects => self.objects(),
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.cli
            .config
            .clone()
            .unwrap_or_else(|| self.cli.data_dir.join("config.json"))
    }

    /// Directory tables are written to
    pub fn output_dir(&self) -> PathBuf {
        self.cli
            .output
            .clone()
            .unwrap_or_else(|| self.cli.data_dir.join("out").join("tables"))
    }

    /// Whether debug logging is wanted, by flag or by config.
    ///
    /// Called before logging is set up, so config errors are ignored here.
    pub fn wants_debug(&self) -> bool {
        self.cli.verbose
            || ExtractorConfig::from_file(self.config_path()).is_ok_and(|config| config.debug)
    }

    fn load_config(&self) -> Result<ExtractorConfig> {
        let path = self.config_path();
        debug!("Loading config from {}", path.display());
        let config = ExtractorConfig::from_file(&path)?;
        config.validate()?;
        Ok(config)
    }

    fn build_client(&self, config: &ExtractorConfig) -> Result<LiveAgentClient> {
        let token = config.token()?;
        match &self.cli.api_url {
            Some(url) => LiveAgentClient::with_base_url(url, token, config.client_options()),
            None => LiveAgentClient::new(config.organization()?, token, config.client_options()),
        }
    }

    /// Run the extraction and return its statistics
    pub async fn extract(&self) -> Result<RunStats> {
        info!("Running version {VERSION}.");

        let config = self.load_config()?;
        let objects = config.object_kinds()?;
        let window = config.window(Utc::now().naive_utc())?;
        let client = self.build_client(&config)?;

        let run_config = RunConfig::new(self.output_dir())
            .with_incremental(config.incremental_load)
            .with_fail_on_error(config.fail_on_error);

        let stats = Extractor::new(client, window, objects, run_config)
            .run()
            .await?;

        self.output_message(&json!({
            "type": "RUN_SUMMARY",
            "summary": {
                "tables": stats.rows_per_table,
                "failed_objects": stats.failed_objects,
                "duration_ms": stats.duration_ms
            }
        }));

        Ok(stats)
    }

    /// Validate config, resolve dates and fetch agents once
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let window = config.window(Utc::now().naive_utc())?;
        info!("Window: {window}");

        let client = self.build_client(&config)?;
        match client.get_agents().await {
            Ok(agents) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": format!("Connection successful, {} agents visible", agents.len())
                    }
                }));
                Ok(())
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
                Err(e)
            }
        }
    }

    fn objects(&self) -> Result<()> {
        let objects: Vec<Value> = ObjectKind::all()
            .iter()
            .map(|kind| {
                json!({
                    "name": kind.name(),
                    "api_version": kind.api_version(),
                    "table": table_for(*kind).name(),
                    "requires_v1_token": kind.requires_v1_token()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "OBJECTS",
            "objects": objects
        }));

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        println!("{msg}");
    }
}
