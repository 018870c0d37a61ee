//! Tests for the output module

use super::*;
use crate::schema::TableId;
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_writer_creates_table_and_manifest() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out").join("tables");

    let mut writer = TableWriter::create(&out, TableId::Tags, true).unwrap();
    let records = vec![
        json!({"id": "t1", "name": "VIP", "color": "fff", "background_color": "000", "is_public": true}),
        json!({"id": "t2", "name": "say \"hi\""}),
    ];
    assert_eq!(writer.write_records(&records, &JsonObject::new()).unwrap(), 2);
    assert_eq!(writer.close().unwrap(), 2);

    let csv = fs::read_to_string(out.join("tags.csv")).unwrap();
    assert_eq!(
        csv,
        "\"t1\",\"VIP\",\"fff\",\"000\",\"true\"\n\"t2\",\"say \"\"hi\"\"\",\"\",\"\",\"\"\n"
    );

    let manifest = Manifest::read(&out.join("tags.csv.manifest")).unwrap();
    assert_eq!(
        manifest,
        Manifest {
            incremental: true,
            primary_key: vec!["id".to_string()],
            columns: vec![
                "id".to_string(),
                "name".to_string(),
                "color".to_string(),
                "background_color".to_string(),
                "is_public".to_string(),
            ],
        }
    );
}

#[test]
fn test_manifest_uses_renamed_columns() {
    let dir = TempDir::new().unwrap();
    let writer = TableWriter::create(dir.path(), TableId::Calls, false).unwrap();
    writer.close().unwrap();

    let text = fs::read_to_string(dir.path().join("calls.csv.manifest")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(manifest["incremental"], json!(false));
    assert_eq!(manifest["primary_key"], json!(["id"]));
    assert_eq!(manifest["columns"][1], json!("ticket_id"));
    assert_eq!(manifest["columns"][3], json!("from_number"));
}

#[test]
fn test_empty_table_still_written() {
    let dir = TempDir::new().unwrap();
    let writer = TableWriter::create(dir.path(), TableId::Departments, true).unwrap();
    let path = writer.path().to_path_buf();
    assert_eq!(writer.close().unwrap(), 0);

    assert_eq!(fs::read_to_string(path).unwrap(), "");
    assert!(dir.path().join("departments.csv.manifest").exists());
}

#[test]
fn test_writer_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("agents.csv"), "stale\n").unwrap();

    let mut writer = TableWriter::create(dir.path(), TableId::Agents, true).unwrap();
    writer
        .write_records(&[json!({"id": "a1"})], &JsonObject::new())
        .unwrap();
    writer.close().unwrap();

    let csv = fs::read_to_string(dir.path().join("agents.csv")).unwrap();
    assert_eq!(csv, "\"a1\",\"\",\"\",\"\",\"\",\"\",\"\",\"\"\n");
}

#[test]
fn test_writer_merges_parent_values() {
    let dir = TempDir::new().unwrap();
    let mut extra = JsonObject::new();
    extra.insert("message_id".to_string(), json!("m1"));

    let mut writer =
        TableWriter::create(dir.path(), TableId::TicketsMessagesContent, true).unwrap();
    writer
        .write_records(
            &[json!({"id": "c1", "userid": "u1", "message": "line1\nline2"})],
            &extra,
        )
        .unwrap();
    assert_eq!(writer.rows_written(), 1);
    writer.close().unwrap();

    let csv = fs::read_to_string(dir.path().join("tickets_messages_content.csv")).unwrap();
    assert_eq!(
        csv,
        "\"c1\",\"m1\",\"u1\",\"\",\"\",\"\",\"line1\nline2\",\"\"\n"
    );
}

#[test]
fn test_manifest_path_for() {
    let path = Manifest::path_for(std::path::Path::new("/tmp/out/chats.csv"));
    assert_eq!(path, std::path::PathBuf::from("/tmp/out/chats.csv.manifest"));
}
