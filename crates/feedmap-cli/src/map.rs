//! `map` command: fetch and map one feed URL given on the command line.

use std::time::Duration;

use anyhow::Context;
use feedmap_core::{AppConfig, CurrencyCode, FeedFormat, MappingReport};
use feedmap_scraper::{run, CancelSignal, FeedClient, FeedRequest, TracingSink};

#[derive(Debug)]
pub(crate) struct MapOptions {
    pub url: String,
    pub format: FeedFormat,
    pub currency: Option<CurrencyCode>,
    pub header_rows: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub emit_products: bool,
}

/// Maps a single feed and prints its summary.
///
/// # Errors
///
/// Returns an error when no currency can be resolved, the header row count
/// is zero, or the run fails (fetch, parse or cancellation).
pub(crate) async fn run_map(
    config: &AppConfig,
    options: MapOptions,
    cancel: &CancelSignal,
) -> anyhow::Result<()> {
    let currency = resolve_currency(options.currency, config)?;
    let header_rows = options.header_rows.unwrap_or(config.raw_header_rows);
    anyhow::ensure!(header_rows >= 1, "--header-rows must be at least 1");

    let cancel = match options.timeout_secs {
        Some(secs) => {
            cancel.child_with_deadline(tokio::time::Instant::now() + Duration::from_secs(secs))
        }
        None => cancel.clone(),
    };

    let client = build_feed_client(config)?;
    let request = FeedRequest::new(options.url, options.format, currency)
        .with_raw_header_rows(header_rows);

    let report = run(&client, &request, &TracingSink, &cancel)
        .await
        .with_context(|| format!("failed to map feed {}", request.url))?;

    print_report(None, &report, options.emit_products)
}

/// `--currency` wins over `FEEDMAP_DEFAULT_CURRENCY`; one of them is required.
pub(crate) fn resolve_currency(
    flag: Option<CurrencyCode>,
    config: &AppConfig,
) -> anyhow::Result<CurrencyCode> {
    flag.or_else(|| config.default_currency.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no currency configured; pass --currency or set FEEDMAP_DEFAULT_CURRENCY")
        })
}

pub(crate) fn build_feed_client(config: &AppConfig) -> anyhow::Result<FeedClient> {
    FeedClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_body_bytes,
    )
    .map_err(|e| anyhow::anyhow!("failed to build feed client: {e}"))
}

/// Prints the summary line and, when asked, every product as a JSON line.
///
/// Products go to stdout; with `emit_products` the summary moves to stderr so
/// stdout stays valid JSON lines.
pub(crate) fn print_report(
    feed_name: Option<&str>,
    report: &MappingReport,
    emit_products: bool,
) -> anyhow::Result<()> {
    let summary = match feed_name {
        Some(name) => format!("{name}: {}", report.summary()),
        None => report.summary(),
    };

    if emit_products {
        for product in &report.products {
            println!("{}", serde_json::to_string(product)?);
        }
        eprintln!("{summary}");
    } else {
        println!("{summary}");
        if !report.rejections.is_empty() || report.structural_skips > 0 {
            println!(
                "  {} rejected, {} skipped, {} total",
                report.rejections.len(),
                report.structural_skips,
                report.total_records
            );
        }
    }
    Ok(())
}
