//! CSV table writer
//!
//! Every field is quoted, quotes inside a field are doubled and rows end
//! with `\n`. No header row is written; column names live in the manifest.

use super::manifest::Manifest;
use crate::error::{Error, Result};
use crate::schema::{TableId, TableSchema};
use crate::types::{JsonObject, JsonValue};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const QUOTE: char = '"';
const DELIMITER: char = ',';
const LINE_ENDING: &str = "\n";

/// Writer for one output table
pub struct TableWriter {
    schema: &'static TableSchema,
    path: PathBuf,
    writer: BufWriter<File>,
    rows_written: usize,
}

impl TableWriter {
    /// Create `<dir>/<table>.csv` (truncating) and its manifest
    pub fn create(dir: impl AsRef<Path>, table: TableId, incremental: bool) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", dir.display()))
        })?;

        let schema = table.schema();
        let path = dir.join(format!("{}.csv", schema.name));

        Manifest::for_table(schema, incremental).write_for(&path)?;

        let file = File::create(&path).map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", path.display()))
        })?;
        debug!("Opened table {} at {}", schema.name, path.display());

        Ok(Self {
            schema,
            path,
            writer: BufWriter::new(file),
            rows_written: 0,
        })
    }

    /// Project and write API records, merging `extra` into every row
    pub fn write_records(&mut self, records: &[JsonValue], extra: &JsonObject) -> Result<usize> {
        for record in records {
            let row = self.schema.project(record, extra);
            self.write_row(&row)?;
        }
        Ok(records.len())
    }

    /// Write one already projected row
    pub fn write_row(&mut self, row: &[JsonValue]) -> Result<()> {
        let mut line = String::new();
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                line.push(DELIMITER);
            }
            line.push_str(&quote_field(&value_to_field(value)));
        }
        line.push_str(LINE_ENDING);

        self.writer.write_all(line.as_bytes())?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush the file and return the row count
    pub fn close(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

impl std::fmt::Debug for TableWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableWriter")
            .field("table", &self.schema.name)
            .field("path", &self.path)
            .field("rows_written", &self.rows_written)
            .finish()
    }
}

/// Render a JSON value as CSV field text
fn value_to_field(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quote_field(field: &str) -> String {
    let escaped = field.replace(QUOTE, "\"\"");
    format!("{QUOTE}{escaped}{QUOTE}")
}

#[cfg(test)]
mod writer_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_field() {
        assert_eq!(value_to_field(&JsonValue::Null), "");
        assert_eq!(value_to_field(&json!("a\"b")), "a\"b");
        assert_eq!(value_to_field(&json!(12)), "12");
        assert_eq!(value_to_field(&json!(1.5)), "1.5");
        assert_eq!(value_to_field(&json!(true)), "true");
        assert_eq!(value_to_field(&json!(["x"])), r#"["x"]"#);
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field(""), r#""""#);
        assert_eq!(quote_field("plain"), r#""plain""#);
        assert_eq!(quote_field(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(quote_field("a,b\nc"), "\"a,b\nc\"");
    }
}
