//! Tests for the extraction engine

use super::*;
use crate::client::ClientOptions;
use crate::pagination::{FetcherConfig, RetryPolicy};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> LiveAgentClient {
    LiveAgentClient::with_base_url(
        &format!("{}/api/", server.uri()),
        "v3-key",
        ClientOptions {
            token_v1: Some("v1-key".to_string()),
            fetcher: FetcherConfig {
                page_size: 500,
                retry: RetryPolicy {
                    attempts: 2,
                    delay: Duration::from_millis(1),
                },
            },
            rate_limit: None,
        },
    )
    .unwrap()
}

fn window(days: u32) -> DateWindow {
    let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let until = from
        .checked_add_days(chrono::Days::new(u64::from(days - 1)))
        .unwrap();
    DateWindow::new(
        from.and_hms_opt(0, 0, 0).unwrap(),
        until.and_hms_opt(12, 0, 0).unwrap(),
    )
}

fn extractor(server: &MockServer, dir: &Path, objects: Vec<ObjectKind>, fail: bool) -> Extractor {
    Extractor::new(
        client(server),
        window(1),
        objects,
        RunConfig::new(dir).with_fail_on_error(fail),
    )
}

fn read(dir: &Path, table: &str) -> String {
    fs::read_to_string(dir.join(format!("{table}.csv"))).unwrap()
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[test]
fn test_table_for_every_object() {
    for kind in ObjectKind::all() {
        let table = table_for(*kind);
        assert_eq!(table.name(), kind.name());
    }
}

#[test]
fn test_run_config_builder() {
    let config = RunConfig::new("/tmp/out")
        .with_incremental(false)
        .with_fail_on_error(true);
    assert!(!config.incremental);
    assert!(config.fail_on_error);
}

#[test]
fn test_run_stats() {
    let mut stats = RunStats::new();
    stats.add_table("agents", 2);
    stats.add_table("tags", 3);
    stats.add_failure("calls");
    stats.add_failure("calls");

    assert_eq!(stats.tables_written(), 2);
    assert_eq!(stats.total_rows(), 5);
    assert_eq!(stats.rows("tags"), Some(3));
    assert_eq!(stats.rows("calls"), None);
    assert_eq!(stats.failed_objects, vec!["calls"]);
    assert!(!stats.is_success());
}

#[tokio::test]
async fn test_run_writes_v3_tables() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/v3/agents", json!([{"id": "a1", "name": "Ann"}])).await;
    mount_json(&server, "/api/v3/tags", json!([{"id": "t1"}, {"id": "t2"}])).await;

    let dir = TempDir::new().unwrap();
    let stats = extractor(
        &server,
        dir.path(),
        vec![ObjectKind::Agents, ObjectKind::Tags],
        false,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(stats.rows("agents"), Some(1));
    assert_eq!(stats.rows("tags"), Some(2));
    assert!(stats.is_success());
    assert!(read(dir.path(), "agents").starts_with("\"a1\",\"Ann\","));
    assert!(dir.path().join("tags.csv.manifest").exists());
}

#[tokio::test]
async fn test_failed_object_is_skipped() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/v3/tags", json!([{"id": "t1"}])).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/agents"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = extractor(
        &server,
        dir.path(),
        vec![ObjectKind::Agents, ObjectKind::Tags],
        false,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(stats.failed_objects, vec!["agents"]);
    assert_eq!(stats.rows("tags"), Some(1));
    assert!(!dir.path().join("agents.csv").exists());
}

#[tokio::test]
async fn test_fail_on_error_aborts_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/agents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = extractor(
        &server,
        dir.path(),
        vec![ObjectKind::Agents, ObjectKind::Tags],
        true,
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Fetch { status: 500, .. }));
}

#[tokio::test]
async fn test_report_fetched_per_day() {
    let server = MockServer::start().await;

    for (day, id) in [("2024-01-01", "r1"), ("2024-01-02", "r2")] {
        Mock::given(method("GET"))
            .and(path("/api/reports/ranking"))
            .and(query_param("date_from", format!("{day} 00:00:00")))
            .and(query_param("date_to", format!("{day} 23:59:59")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": {"ranks": [{"id": id, "comment": "ok"}]}})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let stats = Extractor::new(
        client(&server),
        window(2),
        vec![ObjectKind::RankingAgentsReport],
        RunConfig::new(dir.path()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(stats.rows("ranking_agents_report"), Some(2));
    let csv = read(dir.path(), "ranking_agents_report");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("\"r1\","));
    assert!(lines[0].ends_with(",\"ok\",\"2024-01-01\""));
    assert!(lines[1].ends_with(",\"ok\",\"2024-01-02\""));
}

#[tokio::test]
async fn test_ticket_messages_fan_out() {
    let server = MockServer::start().await;

    mount_json(&server, "/api/v3/tickets", json!([{"id": "t1"}, {"id": "t2"}])).await;
    mount_json(
        &server,
        "/api/v3/tickets/t1/messages",
        json!([{
            "id": "m1",
            "userid": "u1",
            "messages": [
                {"id": "c1", "message": "hello", "datecreated": "2024-01-01 10:00:00"},
                {"id": "c2", "message": "bye"}
            ]
        }]),
    )
    .await;
    mount_json(
        &server,
        "/api/v3/tickets/t2/messages",
        json!([{"id": "m2", "messages": []}]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let stats = extractor(
        &server,
        dir.path(),
        vec![ObjectKind::TicketsMessages],
        false,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(stats.rows("tickets"), Some(2));
    assert_eq!(stats.rows("tickets_messages"), Some(2));
    assert_eq!(stats.rows("tickets_messages_content"), Some(2));

    let messages = read(dir.path(), "tickets_messages");
    let lines: Vec<&str> = messages.lines().collect();
    assert!(lines[0].starts_with("\"m1\",\"\",\"t1\",\"u1\","));
    assert!(lines[1].starts_with("\"m2\",\"\",\"t2\","));

    let content = read(dir.path(), "tickets_messages_content");
    assert_eq!(
        content,
        "\"c1\",\"m1\",\"\",\"\",\"2024-01-01 10:00:00\",\"\",\"hello\",\"\"\n\
         \"c2\",\"m1\",\"\",\"\",\"\",\"\",\"bye\",\"\"\n"
    );
}

#[tokio::test]
async fn test_tickets_failure_marks_ticket_objects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/tickets"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = extractor(
        &server,
        dir.path(),
        vec![ObjectKind::TicketsMessages, ObjectKind::Tickets],
        false,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(stats.failed_objects, vec!["tickets_messages", "tickets"]);
    assert_eq!(stats.tables_written(), 0);
}

#[tokio::test]
async fn test_schema_error_is_skipped_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/calls/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = extractor(
        &server,
        dir.path(),
        vec![ObjectKind::CallsAvailability],
        false,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(stats.failed_objects, vec!["calls_availability"]);
}
