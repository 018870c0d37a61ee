//! Tests for the HTTP transport

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(5),
            Duration::from_millis(20),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

fn backoff_client(backoff_type: BackoffType) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(
            backoff_type,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_config_defaults() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.retry_statuses, vec![502, 504]);
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::default()));
    assert!(config.base_url.is_none());
    assert!(config.headers.is_empty());
}

#[test]
fn test_builder_normalizes_base_url_and_replaces_headers() {
    let config = HttpClientConfig::builder()
        .base_url("https://acme.ladesk.com/api")
        .header("apikey", "old")
        .header("Accept", "application/json")
        .header("APIKEY", "new")
        .max_retries(1)
        .build();

    assert_eq!(
        config.base_url.as_deref(),
        Some("https://acme.ladesk.com/api/")
    );
    assert_eq!(
        config.headers,
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("APIKEY".to_string(), "new".to_string()),
        ]
    );
    assert_eq!(config.max_retries, 1);
}

#[test]
fn test_invalid_header_is_config_error() {
    let config = HttpClientConfig::builder()
        .header("apikey", "line\nbreak")
        .build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(err.is_config());
}

#[test_case("v3/agents", "https://acme.ladesk.com/api/v3/agents" ; "relative")]
#[test_case("/reports/agents", "https://acme.ladesk.com/api/reports/agents" ; "leading slash")]
#[test_case("https://other.example.com/x", "https://other.example.com/x" ; "absolute")]
fn test_build_url(input: &str, expected: &str) {
    let config = HttpClientConfig::builder()
        .base_url("https://acme.ladesk.com/api/")
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(client.build_url(input).unwrap().as_str(), expected);
}

#[test]
fn test_relative_path_without_base_fails() {
    let client =
        HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    assert!(client.build_url("v3/agents").unwrap_err().is_config());
}

#[test_case(BackoffType::Constant, &[100, 100, 100] ; "constant")]
#[test_case(BackoffType::Linear, &[100, 200, 300] ; "linear")]
#[test_case(BackoffType::Exponential, &[100, 200, 400] ; "exponential")]
fn test_backoff_progression(backoff_type: BackoffType, expected_ms: &[u64]) {
    let client = backoff_client(backoff_type);
    for (attempt, ms) in expected_ms.iter().enumerate() {
        assert_eq!(
            client.calculate_backoff(attempt as u32),
            Duration::from_millis(*ms)
        );
    }
}

#[test]
fn test_backoff_is_capped() {
    let client = backoff_client(BackoffType::Exponential);
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[tokio::test]
async fn test_default_headers_and_query_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/tags"))
        .and(header("apikey", "secret123"))
        .and(header("accept", "application/json"))
        .and(query_param("_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .header("apikey", "secret123")
        .header("accept", "application/json")
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get_with_config("v3/tags", RequestConfig::new().query("_page", "2"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_client_error_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/tickets/x/messages"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Ticket not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fast_client(&server)
        .get("v3/tickets/x/messages")
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Ticket not found");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/chats"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "c1"}])))
        .mount(&server)
        .await;

    let response = fast_client(&server).get("v3/chats").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_internal_error_is_left_to_caller() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/calls"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fast_client(&server).get("v3/calls").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_persistent_gateway_error_keeps_last_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/contacts"))
        .respond_with(ResponseTemplate::new(504).set_body_string("Gateway timeout"))
        .expect(4)
        .mount(&server)
        .await;

    let err = fast_client(&server).get("v3/contacts").await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 504);
            assert_eq!(body, "Gateway timeout");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_throttled_request_waits_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/agents"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("Too many requests"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let response = fast_client(&server).get("v3/agents").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_persistent_throttling_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/agents"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("quota exceeded"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .max_retries(1)
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    match client.get("v3/agents").await.unwrap_err() {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_error_hides_query_key() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:9/api")
        .max_retries(0)
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client
        .get_with_config(
            "reports/agents",
            RequestConfig::new().query("apikey", "V1SECRET"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(!err.to_string().contains("V1SECRET"));
    assert!(!format!("{err:?}").contains("V1SECRET"));
}

#[test]
fn test_debug_hides_header_values() {
    let config = HttpClientConfig::builder()
        .header("apikey", "very-secret")
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let debug_str = format!("{client:?}");

    assert!(debug_str.contains("apikey"));
    assert!(!debug_str.contains("very-secret"));
    assert!(client.has_rate_limiter());
}
