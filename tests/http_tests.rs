//! Tests for HTTP module functionality.

use blogport::http::client::{create_http_client, HttpClientConfig};
use blogport::http::{Fetch, HttpFetcher, DEFAULT_USER_AGENT};
use blogport::FetchError;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::helpers::*;

fn fetcher(config: HttpClientConfig) -> HttpFetcher {
    HttpFetcher::new(create_http_client(config).expect("client"))
}

fn no_retries() -> HttpClientConfig {
    HttpClientConfig {
        retries: 0,
        ..HttpClientConfig::default()
    }
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/a.png"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/img/a.png", server.uri())).unwrap();
    let body = fetcher(no_retries()).fetch(&url).await.unwrap();
    assert_eq!(body, PNG_BYTES);
}

#[tokio::test]
async fn test_fetch_sends_custom_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/a.png", server.uri())).unwrap();
    let body = fetcher(create_test_http_config_with_retries(0))
        .fetch(&url)
        .await
        .unwrap();
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_fetch_server_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/broken.png", server.uri())).unwrap();
    let err = fetcher(no_retries()).fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(500)));
}

#[tokio::test]
async fn test_fetch_empty_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/empty.png", server.uri())).unwrap();
    let err = fetcher(no_retries()).fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::EmptyBody));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_request_error() {
    // Nothing listens on the discard port.
    let url = Url::parse("http://127.0.0.1:9/a.png").unwrap();
    let err = fetcher(no_retries()).fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}
