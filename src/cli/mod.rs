//! CLI module
//!
//! Command-line interface for running the extractor.
//!
//! # Commands
//!
//! - `run` - Download the configured objects
//! - `check` - Validate config and test the connection
//! - `objects` - List supported objects

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
