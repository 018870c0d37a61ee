//! Table manifests

use crate::error::{Error, Result};
use crate::schema::TableSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Load instructions written next to every table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub incremental: bool,
    pub primary_key: Vec<String>,
    pub columns: Vec<String>,
}

impl Manifest {
    pub fn for_table(schema: &TableSchema, incremental: bool) -> Self {
        Self {
            incremental,
            primary_key: schema.primary_key.iter().map(ToString::to_string).collect(),
            columns: schema.columns.iter().map(ToString::to_string).collect(),
        }
    }

    /// Manifest path of a table file: `<table>.csv.manifest`
    pub fn path_for(table_path: &Path) -> PathBuf {
        let mut name = table_path.as_os_str().to_owned();
        name.push(".manifest");
        PathBuf::from(name)
    }

    /// Write the manifest next to `table_path`
    pub fn write_for(&self, table_path: &Path) -> Result<PathBuf> {
        let path = Self::path_for(table_path);
        let json = serde_json::to_string(self)?;
        fs::write(&path, json).map_err(|e| {
            Error::output(format!("Failed to write manifest {}: {e}", path.display()))
        })?;
        Ok(path)
    }

    /// Read a manifest back
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
