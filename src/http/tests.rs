//! Tests for the HTTP client module

use super::*;
use crate::auth::Authenticator;
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .max_retries(0)
        .build();
    HttpClient::with_config(config).unwrap()
}

fn fast_retries(server: &MockServer, max_retries: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .retry(RetryPolicy {
            max_retries,
            backoff: BackoffType::Constant,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(1),
        })
        .build();
    HttpClient::with_config(config).unwrap()
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.backoff, BackoffType::Exponential);
    assert!(config.base_url.is_none());
    assert!(config.requests_per_second.is_none());
    assert!(config.user_agent.starts_with("tap-learnupon/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://acme.learnupon.com/api/v1")
        .timeout(Duration::from_secs(60))
        .retry(RetryPolicy {
            backoff: BackoffType::Linear,
            ..RetryPolicy::default()
        })
        .max_retries(5)
        .requests_per_second(4)
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url.as_deref(),
        Some("https://acme.learnupon.com/api/v1")
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.backoff, BackoffType::Linear);
    assert_eq!(config.requests_per_second, Some(4));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let config = HttpClientConfig::builder().base_url("not a url").build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

// ============================================================================
// Retry Policy
// ============================================================================

#[test_case(BackoffType::Constant, 0, 100 ; "constant first")]
#[test_case(BackoffType::Constant, 5, 100 ; "constant later")]
#[test_case(BackoffType::Linear, 0, 100 ; "linear first")]
#[test_case(BackoffType::Linear, 2, 300 ; "linear third")]
#[test_case(BackoffType::Exponential, 1, 200 ; "exponential second")]
#[test_case(BackoffType::Exponential, 2, 400 ; "exponential third")]
#[test_case(BackoffType::Exponential, 10, 500 ; "exponential capped")]
fn test_retry_delay(backoff: BackoffType, attempt: u32, expected_ms: u64) {
    let policy = RetryPolicy {
        max_retries: 3,
        backoff,
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(500),
    };
    assert_eq!(policy.delay(attempt), Duration::from_millis(expected_ms));
}

#[test]
fn test_retry_policy_none() {
    let policy = RetryPolicy::none();
    assert_eq!(policy.max_retries, 0);
    assert_eq!(policy.backoff, RetryPolicy::default().backoff);
}

#[test]
fn test_retry_after_is_bounded_by_max_delay() {
    let policy = RetryPolicy {
        max_delay: Duration::from_secs(30),
        ..RetryPolicy::default()
    };
    assert_eq!(
        policy.wait(0, Some(Duration::from_secs(86_400))),
        Duration::from_secs(30)
    );
    assert_eq!(policy.wait(0, Some(Duration::from_secs(2))), Duration::from_secs(2));
    assert_eq!(policy.wait(1, None), policy.delay(1));
}

#[test]
fn test_exponential_delay_does_not_overflow() {
    let policy = RetryPolicy {
        max_retries: 100,
        backoff: BackoffType::Exponential,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(60),
    };
    assert_eq!(policy.delay(64), Duration::from_secs(60));
}

// ============================================================================
// URL Resolution
// ============================================================================

#[test]
fn test_url_for_appends_to_base_path() {
    let config = HttpClientConfig::builder()
        .base_url("https://acme.learnupon.com/api/v1/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(
        client.url_for("/courses").unwrap().as_str(),
        "https://acme.learnupon.com/api/v1/courses"
    );
    assert_eq!(
        client.url_for("courses/7/modules").unwrap().as_str(),
        "https://acme.learnupon.com/api/v1/courses/7/modules"
    );
    assert_eq!(
        client.url_for("https://other.example.com/x").unwrap().as_str(),
        "https://other.example.com/x"
    );
}

#[test]
fn test_url_for_without_base() {
    let client = HttpClient::new().unwrap();
    let err = client.url_for("/courses").unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_http_client_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/learning_paths"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "learning_paths": [{"id": 1, "name": "Onboarding"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .get(client.url_for("/learning_paths").unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["learning_paths"][0]["name"], "Onboarding");
}

#[tokio::test]
async fn test_http_client_sends_query_from_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "courses": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut url = client.url_for("/courses").unwrap();
    url.query_pairs_mut().append_pair("page", "2");

    let response = client.get(url).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_applies_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .max_retries(0)
        .build();
    let client = HttpClient::with_auth(config, Authenticator::basic("user", "pass")).unwrap();

    assert!(client.authenticator().header_value().is_some());
    let response = client.get(client.url_for("/courses").unwrap()).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(header("User-Agent", "tap-test/2.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .user_agent("tap-test/2.0")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    client.get(client.url_for("/courses").unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_http_client_401_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_retries(&server, 3);
    let err = client
        .get(client.url_for("/courses").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus { status: 401, ref body } if body == "bad credentials"
    ));
}

#[tokio::test]
async fn test_http_client_404_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get(client.url_for("/missing").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let client = fast_retries(&server, 3);
    let response = client.get(client.url_for("/flaky").unwrap()).await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_retries_exhausted_keeps_last_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/always-fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(3)
        .mount(&server)
        .await;

    let client = fast_retries(&server, 2);
    let err = client
        .get(client.url_for("/always-fail").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, ref body } if body == "maintenance"));
}

#[tokio::test]
async fn test_http_client_rate_limit_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = fast_retries(&server, 2);
    let response = client.get(client.url_for("/limited").unwrap()).await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_429_without_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get(client.url_for("/limited").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 7
        }
    ));
}

#[tokio::test]
async fn test_throttled_client_still_completes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .requests_per_second(100)
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert!(client.is_throttled());

    for _ in 0..3 {
        let response = client.get(client.url_for("/courses").unwrap()).await.unwrap();
        assert_eq!(response.status(), 200);
    }
}

#[test]
fn test_http_client_debug_hides_credentials() {
    let config = HttpClientConfig::builder()
        .base_url("https://acme.learnupon.com/api/v1")
        .build();
    let client = HttpClient::with_auth(config, Authenticator::basic("admin", "hunter2")).unwrap();

    let debug = format!("{client:?}");
    assert!(debug.contains("HttpClient"));
    assert!(debug.contains("throttle: None"));
    assert!(!debug.contains("hunter2"));
}

#[tokio::test]
async fn test_long_retry_after_is_capped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "86400"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .retry(RetryPolicy {
            max_retries: 1,
            backoff: BackoffType::Constant,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
        })
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        client.get(client.url_for("/limited").unwrap()),
    )
    .await
    .expect("retry waited past max_delay")
    .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_date_retry_after_falls_back_to_capped_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "Wed, 21 Oct 2026 07:28:00 GMT"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = fast_retries(&server, 1);
    let response = tokio::time::timeout(
        Duration::from_secs(5),
        client.get(client.url_for("/limited").unwrap()),
    )
    .await
    .expect("retry waited past max_delay")
    .unwrap();
    assert_eq!(response.status(), 200);
}
