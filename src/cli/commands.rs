//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LiveAgent helpdesk extractor
#[derive(Parser, Debug)]
#[command(name = "liveagent-extractor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory holding config.json and receiving out/tables
    #[arg(short, long, global = true, default_value = "/data")]
    pub data_dir: PathBuf,

    /// Configuration file (JSON or YAML), defaults to <data-dir>/config.json
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory, defaults to <data-dir>/out/tables
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// API base URL of a self-hosted installation
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Download the configured objects into CSV tables
    Run,

    /// Validate the configuration and test the credentials
    Check,

    /// List supported objects
    Objects,
}
