//! Engine types

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Settings of one extraction run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory the tables and manifests are written to
    pub output_dir: PathBuf,
    /// Incremental-load flag written into every manifest
    pub incremental: bool,
    /// Abort on the first failed object instead of skipping it
    pub fail_on_error: bool,
}

impl RunConfig {
    /// Create a run config writing into `output_dir`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            incremental: true,
            fail_on_error: false,
        }
    }

    /// Set the incremental-load flag
    #[must_use]
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Set fail fast mode
    #[must_use]
    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }
}

/// Outcome of an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows written per table
    pub rows_per_table: BTreeMap<String, usize>,
    /// Objects skipped because their download failed
    pub failed_objects: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished table
    pub fn add_table(&mut self, table: impl Into<String>, rows: usize) {
        self.rows_per_table.insert(table.into(), rows);
    }

    /// Record a skipped object
    pub fn add_failure(&mut self, object: impl Into<String>) {
        let object = object.into();
        if !self.failed_objects.contains(&object) {
            self.failed_objects.push(object);
        }
    }

    pub fn tables_written(&self) -> usize {
        self.rows_per_table.len()
    }

    pub fn total_rows(&self) -> usize {
        self.rows_per_table.values().sum()
    }

    /// Rows written to `table`, if it was written
    pub fn rows(&self, table: &str) -> Option<usize> {
        self.rows_per_table.get(table).copied()
    }

    pub fn is_success(&self) -> bool {
        self.failed_objects.is_empty()
    }

    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
