//! End-to-end tests for `feedmap_scraper::run` against a local HTTP server,
//! one scenario per feed format plus the failure paths that abort a run.

use std::str::FromStr;
use std::sync::Mutex;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedmap_core::{CurrencyCode, FeedFormat, MappingReport, RejectionReason};
use feedmap_scraper::{
    run, CallbackSink, CancelSignal, FeedClient, FeedRequest, ScraperError, TracingSink,
    DEFAULT_MAX_BODY_BYTES,
};

fn test_client() -> FeedClient {
    FeedClient::new(5, "feedmap-test/0.1", DEFAULT_MAX_BODY_BYTES)
        .expect("failed to build test FeedClient")
}

fn usd() -> CurrencyCode {
    CurrencyCode::parse("USD").expect("valid currency")
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal")
}

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn run_feed(server: &MockServer, route: &str, format: FeedFormat) -> MappingReport {
    let request = FeedRequest::new(format!("{}{route}", server.uri()), format, usd());
    run(&test_client(), &request, &TracingSink, &CancelSignal::new())
        .await
        .expect("run should succeed")
}

fn assert_counts_add_up(report: &MappingReport) {
    assert_eq!(
        report.mapped_count + report.rejections.len() + report.structural_skips,
        report.total_records,
        "counts do not add up: {report:?}"
    );
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_feed_end_to_end() {
    let server = MockServer::start().await;
    let body = json!([
        {"productId": "1", "productName": "Widget", "listPrice": "$10.00", "salesPrice": "$8.00"},
        {"productId": "2", "productName": "Gadget", "listPrice": "$5.00"},
        {"productId": "3", "productName": "Gizmo", "listPrice": "19.99 USD", "salesPrice": "$19.99"}
    ]);
    serve(&server, "/customjsonfeed", &body.to_string()).await;

    let report = run_feed(&server, "/customjsonfeed", FeedFormat::Json).await;

    assert_eq!(report.total_records, 3);
    assert_eq!(report.mapped_count, 2);
    assert_eq!(report.summary(), "Mapped 2 products successfully.");
    assert_eq!(report.products[0].list_price.amount, dec("10.00"));
    assert_eq!(report.products[1].list_price, report.products[1].sales_price);
    assert_eq!(
        report.rejections[0].reason,
        RejectionReason::MissingField {
            field: "salesPrice".to_string()
        }
    );
    assert_counts_add_up(&report);
}

// ---------------------------------------------------------------------------
// XML (Google Shopping)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn google_shopping_feed_end_to_end() {
    let server = MockServer::start().await;
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:g="http://base.google.com/ns/1.0">
  <channel>
    <title>Academy Store</title>
    <item>
      <g:id>A1</g:id>
      <title>Desk Lamp</title>
      <g:price>24.99 USD</g:price>
      <g:sale_price>19.99 USD</g:sale_price>
    </item>
    <item>
      <g:id>A2</g:id>
      <title>Chair</title>
      <g:price>89.00 USD</g:price>
    </item>
    <item>
      <title>No identifier</title>
      <g:price>1.00 USD</g:price>
    </item>
  </channel>
</rss>"#;
    serve(&server, "/googleshoppingfeed", body).await;

    let report = run_feed(&server, "/googleshoppingfeed", FeedFormat::Xml).await;

    assert_eq!(report.total_records, 3);
    assert_eq!(report.mapped_count, 2);
    assert_eq!(report.structural_skips, 1);
    assert_eq!(report.products[0].list_price.amount, dec("24.99"));
    assert_eq!(report.products[0].sales_price.amount, dec("19.99"));
    assert_eq!(report.products[1].sales_price.amount, dec("89.00"));
    assert_counts_add_up(&report);
}

// ---------------------------------------------------------------------------
// Raw delimited text
// ---------------------------------------------------------------------------

#[tokio::test]
async fn raw_feed_end_to_end() {
    let server = MockServer::start().await;
    let body = "\
| ProductId | ProductName | Brand | Sales Price | List Price | Description |
|-----------|-------------|-------|-------------|------------|-------------|
| 1 | Smart TV 32\" | Samsung | $349.99 | $399.99 | Full HD Smart TV |
| 2 | Wireless Mouse | Logitech | $19.99 | $24.99 | Ergonomic |

| 3 | Cable |
";
    serve(&server, "/raw", body).await;

    let report = run_feed(&server, "/raw", FeedFormat::Raw).await;

    assert_eq!(report.total_records, 3);
    assert_eq!(report.mapped_count, 2);
    assert_eq!(report.structural_skips, 1);
    assert_eq!(report.products[0].display_name.text, "Smart TV 32\" Samsung");
    assert_eq!(report.products[0].list_price.amount, dec("399.99"));
    assert_eq!(report.products[0].sales_price.amount, dec("349.99"));
    assert_counts_add_up(&report);
}

// ---------------------------------------------------------------------------
// Empty feeds and failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_feed_is_a_zero_report() {
    let server = MockServer::start().await;
    serve(&server, "/empty", "").await;

    let report = run_feed(&server, "/empty", FeedFormat::Json).await;
    assert_eq!(report, MappingReport::empty());
    assert_eq!(report.summary(), "Mapped 0 products successfully.");
}

#[tokio::test]
async fn not_found_aborts_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = FeedRequest::new(format!("{}/gone", server.uri()), FeedFormat::Json, usd());
    let err = run(&test_client(), &request, &TracingSink, &CancelSignal::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn malformed_xml_aborts_run() {
    let server = MockServer::start().await;
    serve(&server, "/bad.xml", "<rss><channel><item></channel></rss>").await;

    let request = FeedRequest::new(format!("{}/bad.xml", server.uri()), FeedFormat::Xml, usd());
    let err = run(&test_client(), &request, &TracingSink, &CancelSignal::new())
        .await
        .unwrap_err();
    assert!(err.is_parse_error(), "got: {err:?}");
}

#[tokio::test]
async fn cancelled_run_reports_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let messages = Mutex::new(Vec::new());
    let sink = CallbackSink::new(
        |m: &str| messages.lock().unwrap().push(m.to_string()),
        |m: &str| messages.lock().unwrap().push(m.to_string()),
    );
    let cancel = CancelSignal::with_timeout(std::time::Duration::from_millis(100));
    let request = FeedRequest::new(format!("{}/slow", server.uri()), FeedFormat::Json, usd());

    let err = run(&test_client(), &request, &sink, &cancel).await.unwrap_err();

    assert!(err.is_cancelled(), "got: {err:?}");
    assert_eq!(*messages.lock().unwrap(), vec!["Starting product mapping..."]);
}
