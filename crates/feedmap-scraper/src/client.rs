//! HTTP download of product feeds.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::cancel::CancelSignal;
use crate::error::ScraperError;

/// Default cap on a downloaded feed body (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// A fetched feed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedBody {
    Content(String),
    /// The server answered successfully with nothing but whitespace.
    Empty,
}

impl FeedBody {
    fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            FeedBody::Empty
        } else {
            FeedBody::Content(text)
        }
    }
}

/// Anything that can turn a feed URL into a body.
///
/// [`FeedClient`] is the HTTP implementation; tests and embedders can supply
/// their own.
pub trait FeedSource: Send + Sync {
    /// Downloads the body at `url`, giving up with
    /// [`ScraperError::Cancelled`] as soon as `cancel` trips.
    fn fetch(
        &self,
        url: &str,
        cancel: &CancelSignal,
    ) -> impl Future<Output = Result<FeedBody, ScraperError>> + Send;
}

/// Single-request HTTP feed fetcher. No retries.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    max_body_bytes: usize,
}

impl FeedClient {
    /// Creates a `FeedClient` with a request timeout, `User-Agent` and body
    /// size cap.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_body_bytes: usize,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// Fetches `url` once.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Cancelled`] if `cancel` has tripped before or trips
    ///   during the transfer. No partial body is ever returned.
    /// - [`ScraperError::InvalidFeedUrl`] if `url` is not an absolute URL.
    /// - [`ScraperError::NotFound`] for HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::ResponseTooLarge`] when the body exceeds the cap.
    /// - [`ScraperError::Http`] for network, TLS or timeout failures.
    pub async fn fetch_feed(
        &self,
        url: &str,
        cancel: &CancelSignal,
    ) -> Result<FeedBody, ScraperError> {
        if cancel.is_cancelled() {
            return Err(ScraperError::Cancelled);
        }
        let parsed = Self::feed_url(url)?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(url, "feed download cancelled");
                Err(ScraperError::Cancelled)
            }
            result = self.download(parsed, url) => result,
        }
    }

    async fn download(&self, parsed: reqwest::Url, url: &str) -> Result<FeedBody, ScraperError> {
        let response = self.client.get(parsed).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let bytes = read_limited_bytes(response, self.max_body_bytes, url).await?;
        tracing::debug!(url, bytes = bytes.len(), "feed downloaded");
        Ok(FeedBody::from_text(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }

    /// Validates that `url` is an absolute `http(s)` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidFeedUrl`] otherwise.
    fn feed_url(url: &str) -> Result<reqwest::Url, ScraperError> {
        let parsed = reqwest::Url::parse(url.trim()).map_err(|e| ScraperError::InvalidFeedUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ScraperError::InvalidFeedUrl {
                url: url.to_owned(),
                reason: format!("unsupported scheme \"{other}\""),
            }),
        }
    }
}

impl FeedSource for FeedClient {
    fn fetch(
        &self,
        url: &str,
        cancel: &CancelSignal,
    ) -> impl Future<Output = Result<FeedBody, ScraperError>> + Send {
        self.fetch_feed(url, cancel)
    }
}

async fn read_limited_bytes(
    mut response: Response,
    limit: usize,
    url: &str,
) -> Result<Vec<u8>, ScraperError> {
    let too_large = || ScraperError::ResponseTooLarge {
        url: url.to_owned(),
        limit,
    };

    if let Some(len) = response.content_length() {
        if usize::try_from(len).map_or(true, |len| len > limit) {
            return Err(too_large());
        }
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
