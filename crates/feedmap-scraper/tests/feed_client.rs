//! Integration tests for `FeedClient::fetch_feed`.
//!
//! Each test stands up a local `wiremock` server, so no real network traffic
//! is made. Covers successful downloads, every HTTP error mapping, the body
//! size cap, and cancellation both before and during a transfer.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedmap_scraper::{CancelSignal, FeedBody, FeedClient, ScraperError, DEFAULT_MAX_BODY_BYTES};

/// Builds a `FeedClient` suitable for tests: 5-second timeout, descriptive UA.
fn test_client() -> FeedClient {
    FeedClient::new(5, "feedmap-test/0.1", DEFAULT_MAX_BODY_BYTES)
        .expect("failed to build test FeedClient")
}

// ---------------------------------------------------------------------------
// Successful downloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_returns_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/productdata/customjsonfeed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"productId":"1"}]"#))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/productdata/customjsonfeed", server.uri());
    let body = test_client()
        .fetch_feed(&url, &CancelSignal::new())
        .await
        .expect("fetch should succeed");

    assert_eq!(body, FeedBody::Content(r#"[{"productId":"1"}]"#.to_string()));
}

#[tokio::test]
async fn fetch_sends_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(header("user-agent", "feedmap-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_feed(&format!("{}/feed", server.uri()), &CancelSignal::new())
        .await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn whitespace_body_is_empty_feed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n\n "))
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_feed(&format!("{}/feed", server.uri()), &CancelSignal::new())
        .await
        .expect("fetch should succeed");
    assert_eq!(body, FeedBody::Empty);
}

// ---------------------------------------------------------------------------
// HTTP errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_is_typed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = test_client()
        .fetch_feed(&url, &CancelSignal::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::NotFound { url: ref u } if *u == url),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_feed(&format!("{}/feed", server.uri()), &CancelSignal::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[tokio::test]
async fn body_over_limit_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
        .mount(&server)
        .await;

    let client = FeedClient::new(5, "feedmap-test/0.1", 1024).expect("client");
    let err = client
        .fetch_feed(&format!("{}/feed", server.uri()), &CancelSignal::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::ResponseTooLarge { limit: 1024, .. }),
        "expected ResponseTooLarge, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn already_cancelled_signal_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancelSignal::new();
    cancel.cancel();
    let err = test_client()
        .fetch_feed(&format!("{}/feed", server.uri()), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "expected Cancelled, got: {err:?}");
}

#[tokio::test]
async fn cancel_during_transfer_returns_cancelled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let cancel = CancelSignal::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = test_client()
        .fetch_feed(&format!("{}/slow", server.uri()), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "expected Cancelled, got: {err:?}");
}

#[tokio::test]
async fn deadline_during_transfer_returns_cancelled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let cancel = CancelSignal::with_timeout(Duration::from_millis(100));
    let err = test_client()
        .fetch_feed(&format!("{}/slow", server.uri()), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "expected Cancelled, got: {err:?}");
}
