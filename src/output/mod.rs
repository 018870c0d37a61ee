//! Output module
//!
//! Writes projected rows into `<table>.csv` files and the JSON manifest
//! (`<table>.csv.manifest`) that declares columns, primary key and the
//! incremental-load flag.

mod manifest;
mod writer;

pub use manifest::Manifest;
pub use writer::TableWriter;

#[cfg(test)]
mod tests;
