//! The fetch → parse → map → report pipeline for a single feed.

use feedmap_core::{CurrencyCode, FeedFormat, MappingOutcome, MappingReport, ReportBuilder};

use crate::cancel::CancelSignal;
use crate::client::{FeedBody, FeedSource};
use crate::error::ScraperError;
use crate::normalize::map_record;
use crate::parse::{parse_feed, ParseOptions, ParsedUnit};
use crate::sink::ProgressSink;

/// Everything needed to map one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub url: String,
    pub format: FeedFormat,
    /// Currency for prices that do not state their own.
    pub default_currency: CurrencyCode,
    /// Leading lines dropped from raw feeds.
    pub raw_header_rows: usize,
}

impl FeedRequest {
    #[must_use]
    pub fn new(url: impl Into<String>, format: FeedFormat, default_currency: CurrencyCode) -> Self {
        Self {
            url: url.into(),
            format,
            default_currency,
            raw_header_rows: ParseOptions::default().raw_header_rows,
        }
    }

    #[must_use]
    pub fn with_raw_header_rows(mut self, rows: usize) -> Self {
        self.raw_header_rows = rows;
        self
    }
}

/// Fetches, parses and maps one feed, returning the finished report.
///
/// Records are processed sequentially in parse order. Structural skips are
/// reported through `sink.info` and rejections through `sink.warn`; neither
/// stops the run. `cancel` is checked before the fetch, raced against it,
/// and checked again before every record, and a cancelled run returns no
/// partial report.
///
/// # Errors
///
/// - Any fetch error from `source` (including [`ScraperError::Cancelled`]).
/// - A parse error when the body is not a valid document of `request.format`.
/// - [`ScraperError::Cancelled`] if `cancel` trips during the record loop.
pub async fn run<S, P>(
    source: &S,
    request: &FeedRequest,
    sink: &P,
    cancel: &CancelSignal,
) -> Result<MappingReport, ScraperError>
where
    S: FeedSource,
    P: ProgressSink + ?Sized,
{
    sink.info("Starting product mapping...");
    if cancel.is_cancelled() {
        tracing::info!(url = %request.url, "run cancelled before fetch");
        return Err(ScraperError::Cancelled);
    }
    tracing::info!(url = %request.url, format = %request.format, "fetching feed");

    let body = match source.fetch(&request.url, cancel).await? {
        FeedBody::Content(body) => body,
        FeedBody::Empty => {
            let report = MappingReport::empty();
            sink.info(&format!("Feed at {} is empty.", request.url));
            sink.info(&report.summary());
            return Ok(report);
        }
    };

    let options = ParseOptions {
        raw_header_rows: request.raw_header_rows,
    };
    let units = parse_feed(request.format, &body, options)?;
    tracing::debug!(url = %request.url, units = units.len(), "feed parsed");

    let mut builder = ReportBuilder::new();
    for unit in units {
        if cancel.is_cancelled() {
            tracing::info!(url = %request.url, "mapping cancelled; discarding partial report");
            return Err(ScraperError::Cancelled);
        }

        match unit {
            ParsedUnit::Skipped(skip) => {
                let who = skip
                    .identifier
                    .as_deref()
                    .map_or_else(|| format!("#{}", skip.position), str::to_owned);
                sink.info(&format!("Skipping entry {who}: {}", skip.reason));
                builder.record_skip();
            }
            ParsedUnit::Record(record) => {
                let outcome = map_record(record, &request.default_currency);
                if let MappingOutcome::Rejected { record, reason } = &outcome {
                    sink.warn(&format!(
                        "Product {} could not be mapped: {reason}",
                        record.identifier()
                    ));
                }
                builder.record_outcome(outcome);
            }
        }
    }

    let report = builder.finish();
    tracing::info!(
        url = %request.url,
        total = report.total_records,
        mapped = report.mapped_count,
        rejected = report.rejections.len(),
        skipped = report.structural_skips,
        "feed mapped"
    );
    sink.info(&report.summary());
    Ok(report)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
