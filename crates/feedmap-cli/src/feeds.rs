//! `feeds` commands: list and run the feeds named in the catalog file.
//!
//! Feed failures are logged and counted rather than aborting the batch, so
//! one unreachable feed does not hide the results of the others.

use anyhow::Context;
use clap::Subcommand;
use futures::stream::{self, StreamExt};

use feedmap_core::{load_feeds, AppConfig, FeedConfig, FeedsFile};
use feedmap_scraper::{run, CancelSignal, FeedRequest, TracingSink};

use crate::map::{build_feed_client, print_report};

/// Sub-commands available under `feeds`.
#[derive(Debug, Subcommand)]
pub enum FeedsCommands {
    /// List the configured feeds
    List,
    /// Map every configured feed, or a single one by name
    Run {
        /// Restrict the run to one feed (by name)
        #[arg(long)]
        feed: Option<String>,

        /// Print every mapped product as a JSON line on stdout
        #[arg(long)]
        emit_products: bool,
    },
}

pub(crate) async fn run_feeds_command(
    config: &AppConfig,
    command: FeedsCommands,
    cancel: &CancelSignal,
) -> anyhow::Result<()> {
    let catalog = load_feeds(&config.feeds_path).with_context(|| {
        format!(
            "failed to load feed catalog from {}",
            config.feeds_path.display()
        )
    })?;

    match command {
        FeedsCommands::List => {
            list_feeds(&catalog);
            Ok(())
        }
        FeedsCommands::Run {
            feed,
            emit_products,
        } => run_catalog(config, &catalog, feed.as_deref(), emit_products, cancel).await,
    }
}

fn list_feeds(catalog: &FeedsFile) {
    if catalog.feeds.is_empty() {
        println!("no feeds configured");
        return;
    }
    for feed in &catalog.feeds {
        println!("{}", feed_line(feed));
    }
}

/// One `feeds list` row; notes, when present, follow the URL after ` # `.
pub(crate) fn feed_line(feed: &FeedConfig) -> String {
    let line = format!(
        "{:<20} {:<5} {} {}",
        feed.name,
        feed.format.to_string(),
        feed.currency,
        feed.url
    );
    match feed.notes.as_deref().map(str::trim) {
        Some(notes) if !notes.is_empty() => format!("{line}  # {notes}"),
        _ => line,
    }
}

/// Resolves the `--feed` filter against the catalog.
///
/// # Errors
///
/// Returns an error if a named feed is not in the catalog.
pub(crate) fn select_feeds<'a>(
    catalog: &'a FeedsFile,
    filter: Option<&str>,
) -> anyhow::Result<Vec<&'a FeedConfig>> {
    match filter {
        Some(name) => catalog
            .find(name)
            .map(|feed| vec![feed])
            .ok_or_else(|| anyhow::anyhow!("feed '{name}' not found in catalog")),
        None => Ok(catalog.feeds.iter().collect()),
    }
}

pub(crate) fn request_for(feed: &FeedConfig, config: &AppConfig) -> FeedRequest {
    FeedRequest::new(feed.url.clone(), feed.format, feed.currency.clone())
        .with_raw_header_rows(feed.header_rows.unwrap_or(config.raw_header_rows))
}

async fn run_catalog(
    config: &AppConfig,
    catalog: &FeedsFile,
    filter: Option<&str>,
    emit_products: bool,
    cancel: &CancelSignal,
) -> anyhow::Result<()> {
    let feeds = select_feeds(catalog, filter)?;
    if feeds.is_empty() {
        println!("no feeds configured; nothing to run");
        return Ok(());
    }

    let client = build_feed_client(config)?;
    let client = &client;
    let max_concurrent = config.max_concurrent_feeds.max(1);
    let feed_count = feeds.len();

    let mut results: Vec<_> = stream::iter(feeds.into_iter().enumerate())
        .map(|(index, feed)| {
            let request = request_for(feed, config);
            async move {
                let result = run(client, &request, &TracingSink, cancel).await;
                (index, feed, result)
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;
    results.sort_by_key(|(index, _, _)| *index);

    let mut failed_feeds: usize = 0;
    for (_, feed, result) in &results {
        match result {
            Ok(report) => print_report(Some(&feed.name), report, emit_products)?,
            Err(e) => {
                tracing::error!(feed = %feed.name, error = %e, "feed run failed");
                eprintln!("{}: failed: {e}", feed.name);
                failed_feeds += 1;
            }
        }
    }

    if cancel.is_cancelled() {
        anyhow::bail!("feed run cancelled");
    }
    if failed_feeds > 0 {
        anyhow::bail!("{failed_feeds} of {feed_count} feeds failed");
    }
    Ok(())
}
